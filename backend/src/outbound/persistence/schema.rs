//! Diesel table definitions.
//!
//! Kept in step with `migrations/` by hand; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `email` carries the `users_email_key` unique constraint and a check
    /// constraint ties `email_sent` to `email_sent_at`.
    users (id) {
        /// Surrogate key assigned on insert.
        id -> Int8,
        /// Trimmed display name.
        #[max_length = 255]
        name -> Varchar,
        /// Trimmed, lower-cased email address.
        #[max_length = 255]
        email -> Varchar,
        /// Insert timestamp, never updated.
        created_at -> Timestamptz,
        /// Whether the confirmation email was delivered.
        email_sent -> Bool,
        /// Delivery timestamp, present exactly when `email_sent` is true.
        email_sent_at -> Nullable<Timestamptz>,
    }
}
