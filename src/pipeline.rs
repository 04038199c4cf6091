//! Compiles and runs ordered lists of tasks.
//!
//! A pipeline always starts from text. String-phase tasks come first, and
//! once a token-phase task has run no string-phase task may follow. On top of
//! the phase order the compiler checks that each task accepts the shape
//! produced by the one before it, so a compiled pipeline never feeds a
//! function data it cannot handle.

use crate::capabilities::helpers::is_helper;
use crate::capabilities::{Phase, Registry};
use crate::error::{FrcError, FrcResult};
use crate::stop_words::StopWordSet;
use crate::task::{compile_step, CompiledTask, Step};
use crate::types::{Data, DataKind, TaskDescriptor};
use std::sync::Arc;
use tracing::debug;

/// Kind name of the stop-word preparation pipeline.
pub const STOP_WORDS_PREP_TASKS: &str = "stopWordsPrepTasks";

/// An ordered, validated list of prepare tasks.
#[derive(Debug, Clone)]
pub struct Pipeline {
  kind: String,
  tasks: Vec<CompiledTask<Step>>,
  output: DataKind,
}

impl Pipeline {
  /// A pipeline that returns its input unchanged.
  pub fn empty(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      tasks: Vec::new(),
      output: DataKind::Text,
    }
  }

  /// Compiles `descriptors` into a pipeline.
  ///
  /// `tokens.removeWords` steps are bound to `stop_words`, or to an empty set
  /// when there are none.
  pub fn compile(
    kind: &str,
    descriptors: &[TaskDescriptor],
    registry: &Registry,
    stop_words: Option<&Arc<StopWordSet>>,
  ) -> FrcResult<Self> {
    let task_kind = format!("A task inside {}", kind);
    let mut tasks = Vec::with_capacity(descriptors.len());
    let mut previous: Option<Phase> = None;
    let mut current = DataKind::Text;

    for descriptor in descriptors {
      let mut task = compile_step(&task_kind, descriptor, registry)?;

      let phase = match task.callable() {
        Step::Helper => None,
        _ if is_helper(task.name()) => None,
        Step::Transform(t) => Some(t.phase()),
        Step::RemoveWords(_) => Some(Phase::Token),
      };
      let phase = phase.ok_or_else(|| FrcError::DisallowedCapability {
        kind: kind.to_string(),
        name: task.name().to_string(),
      })?;

      if previous.is_some_and(|p| p > phase) {
        return Err(violation(kind, task.name(), "expected a tokens function, instead found"));
      }
      current = check_flow(kind, &task, phase, current)?;
      previous = Some(phase);

      if let Some(stop_words) = stop_words {
        task = task.with_stop_words(stop_words);
      }
      tasks.push(task);
    }

    debug!(kind, tasks = tasks.len(), output = ?current, "compiled pipeline");
    Ok(Self {
      kind: kind.to_string(),
      tasks,
      output: current,
    })
  }

  /// Compiles the stop-word preparation pipeline, whose output must stay text.
  pub fn compile_stop_words(descriptors: &[TaskDescriptor], registry: &Registry) -> FrcResult<Self> {
    let pipeline = Self::compile(STOP_WORDS_PREP_TASKS, descriptors, registry, None)?;
    if pipeline.output != DataKind::Text {
      let name = pipeline.tasks.last().map(|t| t.name().to_string()).unwrap_or_default();
      return Err(FrcError::OrderingViolation {
        kind: STOP_WORDS_PREP_TASKS.to_string(),
        name,
        reason: "should return a string and not tokens",
      });
    }
    Ok(pipeline)
  }

  /// Runs `input` through every task in order.
  pub fn run(&self, input: &str) -> Data {
    self
      .tasks
      .iter()
      .fold(Data::Text(input.to_string()), |data, task| task.apply(data))
  }

  /// The shape of the value this pipeline produces.
  pub fn output(&self) -> DataKind {
    self.output
  }

  pub fn kind(&self) -> &str {
    &self.kind
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  /// The capability names of the tasks, in order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.tasks.iter().map(|t| t.name())
  }
}

fn violation(kind: &str, name: &str, reason: &'static str) -> FrcError {
  FrcError::OrderingViolation {
    kind: kind.to_string(),
    name: name.to_string(),
    reason,
  }
}

/// Checks that `task` accepts `current` and returns the shape it produces.
pub(crate) fn check_flow(
  kind: &str,
  task: &CompiledTask<Step>,
  phase: Phase,
  current: DataKind,
) -> FrcResult<DataKind> {
  match (phase, current) {
    (Phase::String, DataKind::Text) | (Phase::Token, DataKind::Tokens) => {}
    (Phase::String, _) => {
      return Err(violation(kind, task.name(), "expected a tokens function, instead found"));
    }
    (Phase::Token, DataKind::Text) => {
      return Err(violation(kind, task.name(), "expected a tokenizer before"));
    }
    (Phase::Token, _) => {
      return Err(violation(kind, task.name(), "cannot follow a bag or set of words with"));
    }
  }

  Ok(match task.callable() {
    Step::Transform(t) => t.output(),
    _ => current,
  })
}
