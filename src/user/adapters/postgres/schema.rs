//! Diesel schema for the user directory.

diesel::table! {
    /// Users keyed by their external identity.
    users (id) {
        /// Store-issued numeric identifier.
        id -> Int8,
        /// Identity provider key, unique.
        #[max_length = 255]
        external_id -> Varchar,
        /// Display name.
        name -> Text,
        /// Email address.
        email -> Text,
        /// Organisational role.
        #[max_length = 64]
        role -> Varchar,
        /// First sign-in timestamp.
        created_at -> Timestamptz,
        /// Latest sign-in timestamp.
        last_login_at -> Timestamptz,
    }
}
