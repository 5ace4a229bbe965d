//! Diesel schema for the task store.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Status label.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attachment metadata. Rows reference tasks by identifier without a
    /// cascading foreign key, so they survive task deletion.
    task_attachments (id) {
        /// Store-assigned attachment identifier.
        id -> Int8,
        /// Owning task identifier.
        task_id -> Int8,
        /// Object-store key.
        #[max_length = 512]
        storage_key -> Varchar,
        /// Uploader-supplied file name.
        #[max_length = 255]
        original_filename -> Varchar,
        /// Declared content type.
        #[max_length = 255]
        content_type -> Nullable<Varchar>,
        /// Payload size in bytes.
        file_size -> Int8,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
    }
}
