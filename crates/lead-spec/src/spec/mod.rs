pub mod field;
pub mod questionnaire;
pub mod step;

pub use field::{FieldKind, FieldSpec};
pub use questionnaire::{
    ConflictColumn, ContactMapping, FormDataShape, LabelledField, QuestionnaireSpec, ServiceType,
    WritePolicy,
};
pub use step::StepSpec;
