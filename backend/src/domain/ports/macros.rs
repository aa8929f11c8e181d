//! Macro generating port error enums with snake_case constructors.
//!
//! Each variant gets a snake_case constructor whose parameters accept
//! `impl Into<T>`, so adapters can write `CollectionStoreError::query(msg)`
//! with a `&str` or a `String`. The enum itself derives `thiserror::Error`
//! with the message given after `=>`.

macro_rules! define_port_error {
    (@ctor $name:ident $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $name:ident $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $name $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleStoreError {
            Unreachable => "store unreachable",
            Query { message: String } => "query failed: {message}",
            Batch { collection: String, rejected: u64 } => "{collection}: {rejected} rejected",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleStoreError::unreachable().to_string(), "store unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SampleStoreError::query("timeout");
        assert_eq!(err, SampleStoreError::Query { message: "timeout".to_owned() });
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleStoreError::batch("menuitems", 3_u64);
        assert_eq!(err.to_string(), "menuitems: 3 rejected");
    }
}
