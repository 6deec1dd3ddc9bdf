//! `define_port_error!`: the single way port error enums are declared.
//!
//! Every repository and the mailer report failures through an enum built by
//! this macro. Each variant gets a `#[error]` message and a snake_case
//! constructor whose field parameters take `impl Into<T>`, so adapters can
//! write `ArticleRepositoryError::query(err.to_string())` or
//! `AdminRepositoryError::email_taken(email.as_str())` without building the
//! struct variant by hand. Services then match on the variants to choose a
//! domain [`ErrorCode`](crate::domain::ErrorCode), typically `Connection` to
//! `service_unavailable` and everything else to `internal_error`.
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by page repository adapters.
//!     pub enum PageRepositoryError {
//!         Connection { message: String } =>
//!             "page repository connection failed: {message}",
//!         Query { message: String } =>
//!             "page repository query failed: {message}",
//!     }
//! }
//!
//! let err = PageRepositoryError::connection("pool timed out");
//! assert_eq!(err.to_string(), "page repository connection failed: pool timed out");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ShelfError {
            Closed => "shelf closed",
            Missing { slug: String } => "no page for {slug}",
            Overfull { slug: String, limit: u16 } => "{slug} exceeds {limit} revisions",
        }
    }

    #[test]
    fn unit_variants_get_zero_argument_constructors() {
        assert_eq!(ShelfError::closed(), ShelfError::Closed);
        assert_eq!(ShelfError::closed().to_string(), "shelf closed");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = ShelfError::missing("about");
        assert_eq!(err.to_string(), "no page for about");
    }

    #[test]
    fn constructors_match_the_repository_errors_in_use() {
        let err = crate::domain::ports::AdminRepositoryError::email_taken("chief@footballvoice.test");
        assert_eq!(
            err.to_string(),
            "admin email already registered: chief@footballvoice.test"
        );
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ShelfError::overfull("contact", 3_u16);
        assert_eq!(
            err,
            ShelfError::Overfull {
                slug: "contact".to_owned(),
                limit: 3
            }
        );
    }
}
