//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions back in recording order, with an
/// independent queue for each port/method pair.
pub struct CassetteReplayer {
    pending: HashMap<(String, String), VecDeque<Interaction>>,
    served: usize,
}

impl CassetteReplayer {
    /// Queue every interaction of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut pending: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            pending
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { pending, served: 0 }
    }

    /// Read and parse a YAML cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str::<Cassette>(&yaml)
            .map(|cassette| Self::new(&cassette))
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Take the next unserved interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns an error once the pair has nothing left to serve.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let queue = self.pending.get_mut(&(port.to_string(), method.to_string()));
        match queue.map(VecDeque::pop_front) {
            Some(Some(interaction)) => {
                self.served += 1;
                Ok(interaction)
            }
            Some(None) => Err(format!(
                "Cassette exhausted: every {port}::{method} interaction has been consumed \
                 ({} served in total).",
                self.served
            )),
            None => {
                let mut recorded: Vec<String> =
                    self.pending.keys().map(|(p, m)| format!("{p}::{m}")).collect();
                recorded.sort();
                Err(format!(
                    "Cassette exhausted: nothing recorded for {port}::{method}. \
                     Recorded pairs: [{}]",
                    recorded.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    fn submit(seq: u64) -> Interaction {
        Interaction {
            seq,
            port: "image_service".into(),
            method: "submit".into(),
            input: json!({"instruction": seq}),
            output: json!({"Ok": {"data": "", "mime_type": "image/png"}}),
        }
    }

    #[test]
    fn replay_in_order() {
        let cassette = make_cassette(vec![submit(0), submit(1)]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("image_service", "submit").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("image_service", "submit").unwrap().seq, 1);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![submit(0)]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_interaction("image_service", "submit").is_ok());
        let err = replayer.next_interaction("image_service", "submit").unwrap_err();
        assert!(err.contains("has been consumed"));
    }

    #[test]
    fn load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cassette.yaml");
        let yaml = serde_yaml::to_string(&make_cassette(vec![submit(0)])).unwrap();
        std::fs::write(&path, yaml).unwrap();

        let mut replayer = CassetteReplayer::load(&path).unwrap();
        assert_eq!(replayer.next_interaction("image_service", "submit").unwrap().seq, 0);
    }

    #[test]
    fn load_garbage_or_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: [[[").unwrap();
        assert!(CassetteReplayer::load(&path).err().unwrap().contains("Failed to parse"));
        assert!(CassetteReplayer::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn unknown_port_errors() {
        let cassette = make_cassette(vec![submit(0)]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("unknown", "method").unwrap_err();
        assert!(err.contains("nothing recorded for unknown::method"));
        assert!(err.contains("image_service::submit"));
    }
}
