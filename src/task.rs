//! Compiles a single [`TaskDescriptor`] against a [`Registry`].

use crate::capabilities::tokens::remove_words;
use crate::capabilities::{Capability, Comparison, Measure, Registry, Transform};
use crate::error::{FrcError, FrcResult};
use crate::stop_words::StopWordSet;
use crate::types::{Data, Similarity, TaskArg, TaskDescriptor};
use std::sync::Arc;

/// Name of the stop-word removal capability.
pub const REMOVE_WORDS: &str = "tokens.removeWords";

/// An executable task: a resolved callable plus its bound arguments.
#[derive(Debug, Clone)]
pub struct CompiledTask<C> {
  name: String,
  callable: C,
  args: Vec<TaskArg>,
}

impl<C> CompiledTask<C> {
  /// The capability name this task was compiled from.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn callable(&self) -> &C {
    &self.callable
  }

  pub fn args(&self) -> &[TaskArg] {
    &self.args
  }
}

/// The callable of a prepare task.
#[derive(Debug, Clone)]
pub enum Step {
  Transform(Transform),
  RemoveWords(Arc<StopWordSet>),
  Helper,
}

impl CompiledTask<Step> {
  /// Runs this step on `data`.
  pub fn apply(&self, data: Data) -> Data {
    match &self.callable {
      Step::Transform(t) => t.apply(data, &self.args),
      Step::RemoveWords(stop_words) => Data::Tokens(remove_words(data.into_tokens(), stop_words)),
      Step::Helper => data,
    }
  }

  /// Binds a stop-word set to a `tokens.removeWords` task.
  pub(crate) fn with_stop_words(mut self, stop_words: &Arc<StopWordSet>) -> Self {
    if let Step::RemoveWords(_) = self.callable {
      self.callable = Step::RemoveWords(Arc::clone(stop_words));
    }
    self
  }
}

impl CompiledTask<Measure> {
  /// Compares `prototype` (the query) against `variant` (a stored identifier).
  pub fn compare(&self, prototype: &Data, variant: &Data) -> Similarity {
    match &self.callable {
      Measure::Binary(f) => f(prototype, variant),
      Measure::Parameterized(f) => {
        let a = self.args.first().and_then(TaskArg::as_f64);
        let b = self.args.get(1).and_then(TaskArg::as_f64);
        f(prototype, variant, a, b)
      }
    }
  }

  /// Number of arguments the comparator is invoked with.
  pub fn arity(&self) -> usize {
    self.callable.arity()
  }
}

/// Compiles a prepare task: a pipeline step or an index builder.
///
/// `kind` names where the descriptor came from and is used in errors.
pub fn compile_step(kind: &str, descriptor: &TaskDescriptor, registry: &Registry) -> FrcResult<CompiledTask<Step>> {
  let name = resolve_name(kind, descriptor)?;
  let capability = registry
    .prepare(&name)
    .ok_or_else(|| FrcError::UnknownCapability {
      kind: kind.to_string(),
      name: name.clone(),
    })?;

  let callable = match capability {
    Capability::Transform(t) => Step::Transform(t.clone()),
    Capability::RemoveWords => {
      if !descriptor.args.is_empty() {
        return Err(FrcError::UnexpectedArguments {
          kind: kind.to_string(),
          name,
          found: join_args(&descriptor.args),
        });
      }
      Step::RemoveWords(Arc::new(StopWordSet::default()))
    }
    Capability::Helper => Step::Helper,
  };

  Ok(CompiledTask {
    name,
    callable,
    args: descriptor.args.clone(),
  })
}

/// Compiles the similarity measure.
///
/// A factory capability is applied here, once, and the comparator it returns
/// becomes the compiled callable.
pub fn compile_measure(
  kind: &str,
  descriptor: &TaskDescriptor,
  registry: &Registry,
) -> FrcResult<CompiledTask<Measure>> {
  let name = resolve_name(kind, descriptor)?;
  let comparison = registry
    .similarity(&name)
    .ok_or_else(|| FrcError::UnknownCapability {
      kind: kind.to_string(),
      name: name.clone(),
    })?;

  let callable = match comparison {
    Comparison::Measure(m) => m.clone(),
    Comparison::Factory(factory) => Measure::Binary(factory(&descriptor.args)),
  };

  Ok(CompiledTask {
    name,
    callable,
    args: descriptor.args.clone(),
  })
}

fn resolve_name(kind: &str, descriptor: &TaskDescriptor) -> FrcResult<String> {
  let name = descriptor.capability.trim();
  if name.is_empty() {
    return Err(FrcError::ConfigShape {
      field: format!("{} function name", kind),
      expected: "a non-empty string",
      found: format!("{:?}", descriptor.capability),
    });
  }
  Ok(name.to_string())
}

fn join_args(args: &[TaskArg]) -> String {
  args.iter().map(TaskArg::to_string).collect::<Vec<_>>().join(", ")
}
