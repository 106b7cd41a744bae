//! Hotel booking test database.
//!
//! Drops and recreates `hotel_booking_test_db` with four tables carrying
//! primary, unique and foreign keys. [`hotel_booking_schema`] is the schema
//! a reader returns for that database.

use crate::model::{ColumnDescriptor, ForeignKeyEdge, KeyKind, Schema};
use crate::reader::ReaderError;

pub const TEST_DATABASE: &str = "hotel_booking_test_db";

const CREATE_GUESTS: &str = "CREATE TABLE Guests (
    guest_id INT AUTO_INCREMENT PRIMARY KEY,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE,
    phone_number VARCHAR(20),
    address VARCHAR(255)
)";

const CREATE_ROOMS: &str = "CREATE TABLE Rooms (
    room_id INT AUTO_INCREMENT PRIMARY KEY,
    room_number VARCHAR(10) NOT NULL UNIQUE,
    room_type VARCHAR(50) NOT NULL,
    price_per_night DECIMAL(10, 2) NOT NULL,
    capacity INT NOT NULL
)";

const CREATE_STAFF: &str = "CREATE TABLE Staff (
    staff_id INT AUTO_INCREMENT PRIMARY KEY,
    employee_id VARCHAR(20) NOT NULL UNIQUE,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    role VARCHAR(50) NOT NULL
)";

const CREATE_BOOKINGS: &str = "CREATE TABLE Bookings (
    booking_id INT AUTO_INCREMENT PRIMARY KEY,
    guest_id INT NOT NULL,
    room_id INT NOT NULL,
    staff_id INT,
    check_in_date DATE NOT NULL,
    check_out_date DATE NOT NULL,
    total_price DECIMAL(10, 2) NOT NULL,
    booking_date DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (guest_id) REFERENCES Guests(guest_id),
    FOREIGN KEY (room_id) REFERENCES Rooms(room_id),
    FOREIGN KEY (staff_id) REFERENCES Staff(staff_id)
)";

#[derive(Debug, thiserror::Error)]
#[error("Error during database creation: {source}")]
pub struct FixtureError {
    pub statement: String,
    #[source]
    pub source: ReaderError,
}

/// Statements in execution order. The first one is the `DROP DATABASE`.
pub fn statements() -> Vec<String> {
    vec![
        format!("DROP DATABASE IF EXISTS `{}`", TEST_DATABASE),
        format!("CREATE DATABASE `{}`", TEST_DATABASE),
        format!("USE `{}`", TEST_DATABASE),
        CREATE_GUESTS.to_string(),
        CREATE_ROOMS.to_string(),
        CREATE_STAFF.to_string(),
        CREATE_BOOKINGS.to_string(),
    ]
}

/// Run every fixture statement through `execute`.
///
/// A failing `DROP` is logged and ignored; any other failure stops the run.
pub fn create_test_database<E>(mut execute: E) -> Result<(), FixtureError>
where
    E: FnMut(&str) -> Result<(), ReaderError>,
{
    for (i, statement) in statements().into_iter().enumerate() {
        match execute(&statement) {
            Ok(()) => tracing::debug!(statement = %first_line(&statement), "executed"),
            Err(e) if i == 0 => {
                tracing::warn!(error = %e, "error dropping database (might not exist)");
            }
            Err(source) => return Err(FixtureError { statement, source }),
        }
    }
    tracing::info!(database = TEST_DATABASE, "test database created");
    Ok(())
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement)
}

/// Schema and foreign keys of the seeded database, tables in name order.
pub fn hotel_booking_schema() -> (Schema, Vec<ForeignKeyEdge>) {
    let varchar = |name: &str, len: u64| ColumnDescriptor::new(name, "varchar").with_length(len);
    let id = |name: &str| {
        ColumnDescriptor::new(name, "int")
            .with_key(KeyKind::Primary)
            .not_null()
            .with_extra("auto_increment")
    };

    let schema = Schema::new()
        .with_table(
            "Bookings",
            vec![
                id("booking_id"),
                ColumnDescriptor::new("guest_id", "int").not_null(),
                ColumnDescriptor::new("room_id", "int").not_null(),
                ColumnDescriptor::new("staff_id", "int"),
                ColumnDescriptor::new("check_in_date", "date").not_null(),
                ColumnDescriptor::new("check_out_date", "date").not_null(),
                ColumnDescriptor::new("total_price", "decimal").not_null(),
                ColumnDescriptor::new("booking_date", "datetime").with_extra("DEFAULT_GENERATED"),
            ],
        )
        .with_table(
            "Guests",
            vec![
                id("guest_id"),
                varchar("first_name", 50).not_null(),
                varchar("last_name", 50).not_null(),
                varchar("email", 100).not_null().with_key(KeyKind::Unique),
                varchar("phone_number", 20),
                varchar("address", 255),
            ],
        )
        .with_table(
            "Rooms",
            vec![
                id("room_id"),
                varchar("room_number", 10).not_null().with_key(KeyKind::Unique),
                varchar("room_type", 50).not_null(),
                ColumnDescriptor::new("price_per_night", "decimal").not_null(),
                ColumnDescriptor::new("capacity", "int").not_null(),
            ],
        )
        .with_table(
            "Staff",
            vec![
                id("staff_id"),
                varchar("employee_id", 20).not_null().with_key(KeyKind::Unique),
                varchar("first_name", 50).not_null(),
                varchar("last_name", 50).not_null(),
                varchar("role", 50).not_null(),
            ],
        );

    let edges = vec![
        ForeignKeyEdge::new("Bookings", "guest_id", "Guests", "guest_id").with_constraint("bookings_ibfk_1"),
        ForeignKeyEdge::new("Bookings", "room_id", "Rooms", "room_id").with_constraint("bookings_ibfk_2"),
        ForeignKeyEdge::new("Bookings", "staff_id", "Staff", "staff_id").with_constraint("bookings_ibfk_3"),
    ];

    (schema, edges)
}
