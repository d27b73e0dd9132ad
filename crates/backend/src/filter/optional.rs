//! Clears the `required` flag of parameters declared optional.
//!
//! The optional marker lives on the handler's declared parameters and is not
//! visible to the generator, so generated entries are correlated by exact
//! name. A declared name with no generated counterpart is skipped.

use tracing::trace;
use utoipa::openapi::{Required, path::Operation};

use super::{FilterContext, OperationFilter};
use crate::domain::operation::{ApiDescription, ParameterDescriptor};

/// Relax the generated entry of each descriptor in `optional`.
pub fn normalize<'a>(operation: &mut Operation, optional: impl IntoIterator<Item = &'a ParameterDescriptor>) {
  let Some(parameters) = operation.parameters.as_mut() else {
    return;
  };

  for descriptor in optional {
    match parameters.iter_mut().find(|p| p.name == descriptor.name) {
      Some(parameter) => parameter.required = Required::False,
      None => trace!(parameter = %descriptor.name, "Optional parameter has no generated entry"),
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalParametersFilter;

impl OperationFilter for OptionalParametersFilter {
  fn apply_operation(&self, operation: &mut Operation, description: &ApiDescription, _ctx: &FilterContext) {
    normalize(operation, description.optional_parameters());
  }
}
