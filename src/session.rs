//! Interactive session state: connection, database selection, status line
//! and the last rendered diagram.

use crate::model::ForeignKeyEdge;
use crate::reader::{ConnectionParams, ReaderError, SchemaSource};
use crate::render::{Diagram, DiagramRenderer};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn color(&self) -> &'static str {
        match self {
            StatusLevel::Info => "blue",
            StatusLevel::Success => "green",
            StatusLevel::Warning => "orange",
            StatusLevel::Error => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// What the database selector currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatabaseSelection {
    #[default]
    NoneSelected,
    NoDatabasesFound,
    Selected(String),
}

impl DatabaseSelection {
    pub fn database(&self) -> Option<&str> {
        match self {
            DatabaseSelection::Selected(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

pub struct Session {
    params: ConnectionParams,
    source: Option<Box<dyn SchemaSource>>,
    databases: Vec<String>,
    selection: DatabaseSelection,
    edges: Vec<ForeignKeyEdge>,
    diagram: Option<Diagram>,
    status: StatusMessage,
    renderer: DiagramRenderer,
}

impl Session {
    pub fn new(params: ConnectionParams) -> Self {
        Self {
            params,
            source: None,
            databases: Vec::new(),
            selection: DatabaseSelection::NoneSelected,
            edges: Vec::new(),
            diagram: None,
            status: StatusMessage {
                text: String::new(),
                level: StatusLevel::Info,
            },
            renderer: DiagramRenderer::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: DiagramRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    pub fn selection(&self) -> &DatabaseSelection {
        &self.selection
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyEdge] {
        &self.edges
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Error => tracing::error!(status = %text),
            StatusLevel::Warning => tracing::warn!(status = %text),
            _ => tracing::info!(status = %text),
        }
        self.status = StatusMessage { text, level };
    }

    /// Open a connection with `connect` and, on success, fill the database list.
    ///
    /// On failure the session keeps no source and no usable selection.
    pub fn connect<F>(&mut self, connect: F) -> bool
    where
        F: FnOnce(&ConnectionParams) -> Result<Box<dyn SchemaSource>, ReaderError>,
    {
        self.set_status(StatusLevel::Info, "Connecting...");

        match connect(&self.params) {
            Ok(source) => {
                self.source = Some(source);
                self.set_status(StatusLevel::Success, "Connection successful!");
                self.populate_databases();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "connection failed");
                self.source = None;
                self.databases.clear();
                self.selection = DatabaseSelection::NoneSelected;
                self.set_status(
                    StatusLevel::Error,
                    "Connection failed. Check credentials and server status.",
                );
                false
            }
        }
    }

    /// Refresh the database list and select the first entry.
    pub fn populate_databases(&mut self) {
        let Some(source) = self.source.as_mut() else {
            self.set_status(StatusLevel::Warning, "Not connected to database.");
            return;
        };

        match source.list_databases() {
            Ok(databases) => {
                self.selection = match databases.first() {
                    Some(first) => DatabaseSelection::Selected(first.clone()),
                    None => DatabaseSelection::NoDatabasesFound,
                };
                self.databases = databases;
            }
            Err(e) => {
                self.databases.clear();
                self.selection = DatabaseSelection::NoDatabasesFound;
                self.set_status(StatusLevel::Error, format!("Error fetching databases: {}", e));
            }
        }
    }

    /// Pick a database from the list. Unknown names are rejected.
    pub fn select_database(&mut self, name: &str) -> bool {
        if self.databases.iter().any(|d| d == name) {
            self.selection = DatabaseSelection::Selected(name.to_string());
            true
        } else {
            self.set_status(
                StatusLevel::Warning,
                format!("Database '{}' is not available.", name),
            );
            false
        }
    }

    /// Read the selected database and draw it onto `surface`.
    ///
    /// Returns the new diagram when the schema loaded and had at least one table.
    pub fn load_schema(&mut self, surface: &mut dyn Surface) -> Option<&Diagram> {
        if self.source.is_none() {
            self.set_status(StatusLevel::Error, "Error: Not connected to a database.");
            return None;
        }

        let Some(database) = self.selection.database().map(str::to_string) else {
            self.set_status(StatusLevel::Warning, "Please select a database.");
            return None;
        };

        self.set_status(
            StatusLevel::Info,
            format!("Loading schema for '{}'...", database),
        );

        surface.clear();
        self.diagram = None;
        self.edges.clear();

        let result = match self.source.as_mut() {
            Some(source) => source.read_schema(&database),
            None => return None,
        };

        match result {
            Ok((schema, edges)) if !schema.is_empty() => {
                let diagram = self.renderer.render(surface, &schema, &edges);
                self.edges = edges;
                self.diagram = Some(diagram);
                self.set_status(
                    StatusLevel::Success,
                    format!("Schema loaded for '{}'.", database),
                );
                self.diagram.as_ref()
            }
            Ok((_, edges)) => {
                self.edges = edges;
                self.set_status(
                    StatusLevel::Warning,
                    format!("No schema found for '{}'.", database),
                );
                None
            }
            Err(e) => {
                self.set_status(StatusLevel::Error, format!("Error loading schema: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{TEST_DATABASE, hotel_booking_schema};
    use crate::model::Schema;
    use crate::svg::SvgSurface;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeSource {
        databases: Vec<String>,
        fail_list: bool,
        fail_schema: bool,
        reads: Rc<Cell<usize>>,
    }

    impl SchemaSource for FakeSource {
        fn list_databases(&mut self) -> Result<Vec<String>, ReaderError> {
            if self.fail_list {
                return Err(ReaderError::Query("Access denied".into()));
            }
            Ok(self.databases.clone())
        }

        fn read_schema(&mut self, database: &str) -> Result<(Schema, Vec<ForeignKeyEdge>), ReaderError> {
            self.reads.set(self.reads.get() + 1);
            if self.fail_schema {
                return Err(ReaderError::Query("Lost connection".into()));
            }
            if database == TEST_DATABASE {
                Ok(hotel_booking_schema())
            } else {
                Ok((Schema::new(), Vec::new()))
            }
        }
    }

    fn fake(databases: &[&str]) -> (FakeSource, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let source = FakeSource {
            databases: databases.iter().map(|s| s.to_string()).collect(),
            fail_list: false,
            fail_schema: false,
            reads: reads.clone(),
        };
        (source, reads)
    }

    fn connected(databases: &[&str]) -> (Session, Rc<Cell<usize>>) {
        let (source, reads) = fake(databases);
        let mut session = Session::new(ConnectionParams::default());
        assert!(session.connect(move |_| Ok(Box::new(source) as Box<dyn SchemaSource>)));
        (session, reads)
    }

    #[test]
    fn test_connect_selects_first_database() {
        let (session, _) = connected(&[TEST_DATABASE, "other"]);
        assert!(session.is_connected());
        assert_eq!(session.databases().len(), 2);
        assert_eq!(session.selection().database(), Some(TEST_DATABASE));
        assert_eq!(session.status().level, StatusLevel::Success);
    }

    #[test]
    fn test_connect_with_no_databases() {
        let (session, _) = connected(&[]);
        assert_eq!(session.selection(), &DatabaseSelection::NoDatabasesFound);
        assert_eq!(session.selection().database(), None);
    }

    #[test]
    fn test_no_databases_refuses_load() {
        let (mut session, reads) = connected(&[]);
        let mut surface = SvgSurface::default();

        assert!(session.load_schema(&mut surface).is_none());
        assert_eq!(session.status().text, "Please select a database.");
        assert_eq!(session.status().level, StatusLevel::Warning);
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_database_list_failure() {
        let (mut source, reads) = fake(&[TEST_DATABASE]);
        source.fail_list = true;
        let mut session = Session::new(ConnectionParams::default());
        assert!(session.connect(move |_| Ok(Box::new(source) as Box<dyn SchemaSource>)));

        assert_eq!(session.status().level, StatusLevel::Error);
        assert_eq!(session.status().text, "Error fetching databases: Access denied");
        assert_eq!(session.selection(), &DatabaseSelection::NoDatabasesFound);
        assert!(session.databases().is_empty());

        let mut surface = SvgSurface::default();
        assert!(session.load_schema(&mut surface).is_none());
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_failed_refresh_drops_previous_list() {
        struct FlakySource {
            calls: usize,
        }

        impl SchemaSource for FlakySource {
            fn list_databases(&mut self) -> Result<Vec<String>, ReaderError> {
                self.calls += 1;
                if self.calls > 1 {
                    return Err(ReaderError::Query("Lost connection".into()));
                }
                Ok(vec![TEST_DATABASE.to_string()])
            }

            fn read_schema(&mut self, _: &str) -> Result<(Schema, Vec<ForeignKeyEdge>), ReaderError> {
                Ok(hotel_booking_schema())
            }
        }

        let mut session = Session::new(ConnectionParams::default());
        session.connect(|_| Ok(Box::new(FlakySource { calls: 0 }) as Box<dyn SchemaSource>));
        assert_eq!(session.selection().database(), Some(TEST_DATABASE));

        session.populate_databases();
        assert_eq!(session.status().level, StatusLevel::Error);
        assert_eq!(session.selection(), &DatabaseSelection::NoDatabasesFound);
        assert!(session.databases().is_empty());
    }

    #[test]
    fn test_failed_connect_blocks_load() {
        let mut session = Session::new(ConnectionParams::default());
        let ok = session.connect(|_| Err(ReaderError::Connect("Access denied".into())));

        assert!(!ok);
        assert!(!session.is_connected());
        assert_eq!(session.selection().database(), None);
        assert_eq!(session.status().level, StatusLevel::Error);

        let mut surface = SvgSurface::default();
        assert!(session.load_schema(&mut surface).is_none());
        assert_eq!(session.status().text, "Error: Not connected to a database.");
        assert_eq!(session.status().level.color(), "red");
    }

    #[test]
    fn test_load_schema_renders() {
        let (mut session, _) = connected(&[TEST_DATABASE]);
        let mut surface = SvgSurface::default();

        let diagram = session.load_schema(&mut surface).unwrap();
        assert_eq!(diagram.boxes.len(), 4);
        assert_eq!(diagram.connectors.len(), 3);
        assert_eq!(session.foreign_keys().len(), 3);
        assert_eq!(
            session.status().text,
            format!("Schema loaded for '{}'.", TEST_DATABASE)
        );
        assert!(surface.to_svg().contains("Bookings"));
    }

    #[test]
    fn test_reload_reuses_connection_and_is_stable() {
        let (mut session, reads) = connected(&[TEST_DATABASE]);
        let mut surface = SvgSurface::default();

        let first = session.load_schema(&mut surface).unwrap().boxes.clone();
        let second = session.load_schema(&mut surface).unwrap().boxes.clone();

        assert_eq!(first, second);
        assert_eq!(reads.get(), 2);
        assert!(session.is_connected());
    }

    #[test]
    fn test_empty_database_warns_and_clears() {
        let (mut session, _) = connected(&[TEST_DATABASE, "empty_db"]);
        let mut surface = SvgSurface::default();
        session.load_schema(&mut surface);
        assert!(!surface.is_empty());

        assert!(session.select_database("empty_db"));
        assert!(session.load_schema(&mut surface).is_none());
        assert_eq!(session.status().level, StatusLevel::Warning);
        assert!(surface.is_empty());
        assert!(session.diagram().is_none());
    }

    #[test]
    fn test_query_failure_leaves_empty_state() {
        let (mut source, _) = fake(&[TEST_DATABASE]);
        source.fail_schema = true;
        let mut session = Session::new(ConnectionParams::default());
        session.connect(move |_| Ok(Box::new(source) as Box<dyn SchemaSource>));

        let mut surface = SvgSurface::default();
        assert!(session.load_schema(&mut surface).is_none());
        assert_eq!(session.status().level, StatusLevel::Error);
        assert!(session.status().text.starts_with("Error loading schema:"));
        assert!(session.foreign_keys().is_empty());
        assert!(session.is_connected());
    }

    #[test]
    fn test_select_unknown_database() {
        let (mut session, _) = connected(&[TEST_DATABASE]);
        assert!(!session.select_database("missing"));
        assert_eq!(session.selection().database(), Some(TEST_DATABASE));
    }

    #[test]
    fn test_populate_without_connection() {
        let mut session = Session::new(ConnectionParams::default());
        session.populate_databases();
        assert_eq!(session.status().text, "Not connected to database.");
        assert_eq!(session.status().level.color(), "orange");
    }
}
