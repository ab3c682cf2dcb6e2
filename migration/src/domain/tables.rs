use workflow_common::{
    ACTOR_ID_FIELD_NAME, CAPABILITIES_TABLE_NAME, CAPABILITY_FIELD_NAME, CREATED_FIELD_NAME,
    DRAFT_ID_FIELD_NAME, ENABLED_FIELD_NAME, ENTRIES_TABLE_NAME, FIELDS_FIELD_NAME, ID_FIELD_NAME,
    OWNER_ID_FIELD_NAME, OWNER_SITE_ID_FIELD_NAME, REASON_FIELD_NAME, REVIEWED_BY_FIELD_NAME,
    SCOPE_FIELD_NAME, SECTION_FIELD_NAME, SITE_ID_FIELD_NAME, STATUS_FIELD_NAME,
    SUBMISSIONS_TABLE_NAME, SUBMITTED_BY_FIELD_NAME, TITLE_FIELD_NAME, UPDATED_FIELD_NAME,
};

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
    pub check: Option<String>,
}

/// Represents an index in the database table
pub struct Index {
    pub name: String,
    pub table_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    /// Makes the index partial
    pub predicate: Option<String>,
}

impl Table {
    pub fn new<T: Into<String>>(name: T, columns: Vec<Column>, indexes: Vec<Index>) -> Self {
        Self {
            name: name.into(),
            columns,
            indexes,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(name: T, column_type: T, not_null: bool, default_value: Option<T>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null,
            primary_key: false,
            default_value: default_value.map(T::into),
            check: None,
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: T) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null: false,
            primary_key: true,
            default_value: None,
            check: None,
        }
    }

    pub fn with_check<T: Into<String>>(mut self, check: T) -> Self {
        self.check = Some(check.into());
        self
    }
}

impl Index {
    pub fn new<T: Into<String>>(table_name: T, columns: Vec<T>, unique: bool) -> Self {
        let table_name = table_name.into();
        let columns: Vec<String> = columns.into_iter().map(T::into).collect();
        Self {
            name: format!("{}_{}_idx", table_name, columns.join("_")),
            table_name,
            columns,
            unique,
            predicate: None,
        }
    }

    pub fn partial<T: Into<String>>(mut self, suffix: &str, predicate: T) -> Self {
        self.name = format!("{}_{}_idx", self.name.trim_end_matches("_idx"), suffix);
        self.predicate = Some(predicate.into());
        self
    }
}

/// Tables the workflow service works with
pub fn workflow_tables() -> Vec<Table> {
    vec![entries_table(), submissions_table(), capabilities_table()]
}

fn timestamps() -> [Column; 2] {
    [
        Column::new(CREATED_FIELD_NAME, "TIMESTAMPTZ", true, Some("now()")),
        Column::new(UPDATED_FIELD_NAME, "TIMESTAMPTZ", true, Some("now()")),
    ]
}

fn entries_table() -> Table {
    let mut columns = vec![
        Column::primary_key(OWNER_ID_FIELD_NAME, "TEXT"),
        Column::primary_key(SITE_ID_FIELD_NAME, "TEXT"),
        Column::primary_key(DRAFT_ID_FIELD_NAME, "TEXT"),
        Column::new(SECTION_FIELD_NAME, "TEXT", true, None),
        Column::new(TITLE_FIELD_NAME, "TEXT", true, Some("''")),
        Column::new(FIELDS_FIELD_NAME, "JSONB", true, Some("'{}'::jsonb")),
        Column::new(ENABLED_FIELD_NAME, "BOOLEAN", true, Some("FALSE")),
    ];
    columns.extend(timestamps());

    Table::new(
        ENTRIES_TABLE_NAME,
        columns,
        vec![Index::new(ENTRIES_TABLE_NAME, vec![SECTION_FIELD_NAME], false)],
    )
}

fn submissions_table() -> Table {
    let owner_columns = vec![OWNER_ID_FIELD_NAME, OWNER_SITE_ID_FIELD_NAME, DRAFT_ID_FIELD_NAME];

    let mut columns = vec![
        Column::primary_key(ID_FIELD_NAME, "UUID"),
        Column::new(OWNER_ID_FIELD_NAME, "TEXT", true, None),
        Column::new(OWNER_SITE_ID_FIELD_NAME, "TEXT", true, None),
        Column::new(DRAFT_ID_FIELD_NAME, "TEXT", true, Some("''")),
        Column::new(STATUS_FIELD_NAME, "TEXT", true, None)
            .with_check(format!("{} IN ('submitted', 'approved', 'rejected')", STATUS_FIELD_NAME)),
        Column::new(SUBMITTED_BY_FIELD_NAME, "TEXT", false, None),
        Column::new(REVIEWED_BY_FIELD_NAME, "TEXT", false, None),
        Column::new(REASON_FIELD_NAME, "TEXT", false, None),
    ];
    columns.extend(timestamps());

    // at most one submission per entity version waits for review
    let active = Index::new(SUBMISSIONS_TABLE_NAME, owner_columns.clone(), true)
        .partial("active", format!("{} = 'submitted'", STATUS_FIELD_NAME));

    let mut history_columns = owner_columns;
    history_columns.push(CREATED_FIELD_NAME);
    let history = Index::new(SUBMISSIONS_TABLE_NAME, history_columns, false);

    Table::new(SUBMISSIONS_TABLE_NAME, columns, vec![active, history])
}

fn capabilities_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, "BIGSERIAL"),
        Column::new(ACTOR_ID_FIELD_NAME, "TEXT", true, None),
        Column::new(CAPABILITY_FIELD_NAME, "TEXT", true, None),
        // NULL grants the capability in every section
        Column::new(SCOPE_FIELD_NAME, "TEXT", false, None),
    ];

    Table::new(
        CAPABILITIES_TABLE_NAME,
        columns,
        vec![Index::new(
            CAPABILITIES_TABLE_NAME,
            vec![ACTOR_ID_FIELD_NAME, CAPABILITY_FIELD_NAME],
            false,
        )],
    )
}
