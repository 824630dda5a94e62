//! `define_port_error!` builds the error enum of a driven port.
//!
//! Every variant carries exactly one `String` field. The macro derives
//! `thiserror::Error` with the given message and adds a snake_case
//! constructor taking `impl Into<String>`:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum TopicRepositoryError {
//!         Query { message: String } => "topic query failed: {message}",
//!     }
//! }
//! let err = TopicRepositoryError::query("timeout");
//! ```

macro_rules! define_port_error {
    (
        $(#[$enum_attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident { $field:ident : String } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_attr])*
                #[error($message)]
                $variant { $field: String },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($field: impl Into<String>) -> Self {
                        Self::$variant { $field: $field.into() }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;
