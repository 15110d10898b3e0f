//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records and their latest execution outcome.
    nlp_tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Owning user identifier.
        user_id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Task type.
        #[max_length = 50]
        task_type -> Varchar,
        /// Input text sent to the provider.
        input_data -> Text,
        /// Task priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional agent-configuration reference.
        agent_config -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Output of the latest successful attempt.
        output_data -> Nullable<Text>,
        /// Error of the latest failed attempt.
        error_message -> Nullable<Text>,
        /// Duration of the latest finished attempt, in milliseconds.
        processing_time -> Nullable<Int8>,
        /// Completion timestamp of the latest successful attempt.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only execution log entries.
    task_logs (id) {
        /// Store-assigned entry identifier.
        id -> Int8,
        /// Task the entry belongs to.
        task_id -> Int8,
        /// Log message.
        message -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_logs -> nlp_tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(nlp_tasks, task_logs);
