//! Diesel schema for checklist persistence.

diesel::table! {
    /// Checklists, one per work order.
    todo_lists (id) {
        /// Checklist identifier.
        id -> Uuid,
        /// Source work order, unique.
        #[max_length = 255]
        work_order_id -> Varchar,
        /// Display name.
        name -> Text,
        /// Description.
        description -> Text,
        /// Project label.
        belongs_to -> Text,
        /// Owning user, null when unassigned.
        user_id -> Nullable<Int8>,
        /// Archival flag.
        is_history -> Bool,
        /// Creation timestamp.
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks seeded from the template.
    todos (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning checklist.
        todolist_id -> Uuid,
        /// Task description.
        text -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Template position at seeding time.
        position -> Int4,
    }
}

diesel::table! {
    /// Template entries copied into new checklists.
    default_todos (id) {
        /// Entry identifier.
        id -> Int4,
        /// Ordering key.
        position -> Int4,
        /// Task description.
        text -> Text,
    }
}

diesel::joinable!(todos -> todo_lists (todolist_id));
diesel::allow_tables_to_appear_in_same_query!(todo_lists, todos);
