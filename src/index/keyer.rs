//! Derives index keys from identifiers and queries.

use crate::capabilities::IndexMode;
use crate::error::{FrcError, FrcResult};
use crate::index::builder::IndexBuilder;
use crate::pipeline::{check_flow, Pipeline};
use crate::task::{CompiledTask, Step};

/// Kind name of the index capability in the rules.
pub const INDEX_USING: &str = "indexUsing";

/// The compiled `indexUsing` capability together with its prep pipeline.
///
/// The same keyer is used at build time, for identifiers, and at query time,
/// so both sides are keyed identically.
#[derive(Debug, Clone)]
pub struct IndexKeyer {
    prep: Pipeline,
    task: CompiledTask<Step>,
    mode: IndexMode,
}

impl IndexKeyer {
    /// Validates that `task` can build an index from the output of `prep`.
    pub fn new(prep: Pipeline, task: CompiledTask<Step>) -> FrcResult<Self> {
        let transform = match task.callable() {
            Step::Transform(t) => t,
            _ => {
                return Err(FrcError::DisallowedCapability {
                    kind: INDEX_USING.to_string(),
                    name: task.name().to_string(),
                })
            }
        };
        let mode = transform.index_mode().ok_or_else(|| FrcError::DisallowedCapability {
            kind: INDEX_USING.to_string(),
            name: task.name().to_string(),
        })?;

        // The first-character mode reads the raw input and skips `prep`.
        if mode == IndexMode::Keys {
            check_flow(INDEX_USING, &task, transform.phase(), prep.output())?;
        }

        Ok(Self { prep, task, mode })
    }

    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// The index keys of a raw identifier or query, in traversal order.
    pub fn keys(&self, raw: &str) -> Vec<String> {
        match self.mode {
            IndexMode::FirstChar => raw.chars().next().map(String::from).into_iter().collect(),
            IndexMode::Keys => self.task.apply(self.prep.run(raw)).keys(),
        }
    }

    /// Inserts every key of `raw` into `builder` under `row_id`.
    pub fn index(&self, raw: &str, builder: &mut dyn IndexBuilder, row_id: usize) {
        for key in self.keys(raw) {
            builder.insert(&key, row_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Registry;
    use crate::index::InvertedIndex;
    use crate::task::compile_step;
    use crate::types::TaskDescriptor;

    fn keyer(prep: &[&str], using: TaskDescriptor) -> FrcResult<IndexKeyer> {
        let registry = Registry::standard();
        let prep: Vec<_> = prep.iter().map(|n| TaskDescriptor::new(*n)).collect();
        let prep = Pipeline::compile("indexPrepTasks", &prep, &registry, None)?;
        IndexKeyer::new(prep, compile_step(INDEX_USING, &using, &registry)?)
    }

    #[test]
    fn test_bow_keys() {
        let keyer = keyer(&["string.lowerCase", "string.tokenize0"], TaskDescriptor::new("tokens.bow")).unwrap();
        assert_eq!(keyer.keys("Object Map object"), vec!["map", "object"]);
    }

    #[test]
    fn test_ngram_keys_use_bound_size() {
        let keyer = keyer(&[], TaskDescriptor::new("string.ngram").arg(3u32)).unwrap();
        let mut index = InvertedIndex::new();
        keyer.index("abcd", &mut index, 7);
        assert_eq!(index.get("abc"), &[7]);
        assert_eq!(index.get("bcd"), &[7]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_first_char_ignores_prep() {
        let keyer = keyer(&["string.upperCase"], TaskDescriptor::new("string.soc")).unwrap();
        assert_eq!(keyer.keys("rachna"), vec!["r"]);
        assert!(keyer.keys("").is_empty());
    }

    #[test]
    fn test_non_indexing_capabilities_are_rejected() {
        for name in ["string.lowerCase", "tokens.removeWords", "helper.index"] {
            let err = keyer(&["string.tokenize"], TaskDescriptor::new(name)).unwrap_err();
            assert!(matches!(err, FrcError::DisallowedCapability { .. }), "{}", name);
        }
    }

    #[test]
    fn test_index_capability_must_accept_prep_output() {
        let err = keyer(&["string.lowerCase"], TaskDescriptor::new("tokens.bow")).unwrap_err();
        assert!(matches!(err, FrcError::OrderingViolation { .. }));
    }
}
