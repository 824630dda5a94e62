//! Diesel table definitions.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered accounts. `username` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Known topic names per user, unique on `(user_id, name)`.
    topics (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Practice questions. `topic` is the raw name, not a foreign key.
    questions (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        topic -> Varchar,
        /// One of `Easy`, `Medium`, `Hard`.
        difficulty -> Varchar,
        code -> Text,
        notes -> Text,
        link -> Text,
        is_revised -> Bool,
        last_revised_date -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(topics -> users (user_id));
diesel::joinable!(questions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, topics, questions);
