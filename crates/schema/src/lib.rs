//! Declarative field validation and record dumping.
//!
//! Declare fields with a [`FieldKind`] and constraints, check untyped
//! [`Value`]s with `validate`, and convert accepted values into typed
//! output with `dump`. A [`Schema`] binds a set of fields to a model and
//! validates or dumps whole records; compiled schemas live in the global
//! [`Registry`].
//!
//! ```rust,ignore
//! use schema_helper::prelude::*;
//!
//! #[derive(Default, serde::Serialize)]
//! struct User { id: i64, username: String }
//!
//! struct UserSchema;
//!
//! impl DeclareSchema for UserSchema {
//!     fn definition() -> SchemaDefinition {
//!         SchemaDefinition::new()
//!             .model::<User>()
//!             .field("id", FieldSpec::integer().required(true))
//!             .field("username", FieldSpec::string().required(true))
//!     }
//! }
//!
//! let schema = Schema::of::<UserSchema>()?;
//! let user = User { id: 7, username: "testuser".into() };
//! assert_eq!(
//!     schema.dump_to_json(&Record::from_model(&user)?.into(), true)?,
//!     r#"{"id":7,"username":"testuser"}"#,
//! );
//! ```

pub mod catalog;
pub mod datetime;
pub mod error;
pub mod factory;
pub mod field;
pub mod kind;
pub mod model;
pub mod registry;
pub mod schema;
pub mod value;

pub use catalog::Catalog;
pub use datetime::Timestamp;
pub use error::{Result, SchemaError};
pub use factory::{FieldFactory, FieldSpec};
pub use field::Field;
pub use kind::FieldKind;
pub use model::{ModelDef, Record};
pub use registry::Registry;
pub use schema::{DeclareSchema, Schema, SchemaDefinition};
pub use value::{Number, Value, numeric};

pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::datetime::Timestamp;
    pub use crate::error::SchemaError;
    pub use crate::factory::{FieldFactory, FieldSpec};
    pub use crate::field::{
        BoolField, Bounds, DateTimeField, DoubleField, EmailField, Field, IntField, RangedField,
        RegExField, SchemaField, StringField,
    };
    pub use crate::kind::FieldKind;
    pub use crate::model::{ModelDef, Record};
    pub use crate::registry::{Registry, SchemaEntry};
    pub use crate::schema::{DeclareSchema, ModelRef, Schema, SchemaDefinition};
    pub use crate::value::{Number, Value};
}
