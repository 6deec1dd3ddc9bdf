//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Articles, published or draft.
    articles (id) {
        id -> Uuid,
        title -> Text,
        content -> Text,
        excerpt -> Text,
        /// Kebab-case category name; constrained by a CHECK.
        category -> Text,
        tags -> Array<Text>,
        published -> Bool,
        featured -> Bool,
        image_url -> Nullable<Text>,
        published_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        read_time -> Int4,
        views -> Int8,
        author -> Text,
    }
}

diesel::table! {
    /// Static pages keyed by slug.
    pages (slug) {
        slug -> Text,
        title -> Text,
        content -> Text,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    subscribers (id) {
        id -> Uuid,
        /// Lowercased, unique.
        email -> Text,
        name -> Nullable<Text>,
        subscribed_at -> Timestamptz,
        active -> Bool,
        categories -> Array<Text>,
        frequency -> Text,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_email -> Text,
        message -> Text,
        sent_at -> Timestamptz,
    }
}

diesel::table! {
    admins (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        /// `sha256$<salt>$<digest>`; never leaves the persistence layer.
        password_digest -> Text,
    }
}

diesel::table! {
    /// At most one pending code per admin email.
    login_codes (email) {
        email -> Text,
        code_digest -> Text,
        expires_at -> Timestamptz,
        failed_attempts -> Int4,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    articles,
    pages,
    subscribers,
    notifications,
    admins,
    login_codes,
);
