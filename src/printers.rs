use std::fmt::{self, Write};

use serde_json::Value;

use crate::resources::{
    Api, ApiVersion, Environment, Mock, Monitor, Schema, User, Workspace,
};
use crate::tabwriter::tabbed_string;

/// A resource that can be shown as one row of a table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrintOptions {
    pub no_headers: bool,
}

/// Writes resources as tab-separated output.
pub trait ResourcePrinter {
    fn print_resources<T: TableRow>(&self, resources: &[T], out: &mut dyn Write) -> fmt::Result;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TablePrinter {
    options: PrintOptions,
}

impl TablePrinter {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }
}

impl ResourcePrinter for TablePrinter {
    fn print_resources<T: TableRow>(&self, resources: &[T], out: &mut dyn Write) -> fmt::Result {
        if !self.options.no_headers {
            writeln!(out, "{}", T::HEADERS.join("\t"))?;
        }
        for resource in resources {
            writeln!(out, "{}", resource.row().join("\t"))?;
        }
        Ok(())
    }
}

/// Renders resources as an aligned table.
pub fn table_string<T: TableRow>(
    resources: &[T],
    options: PrintOptions,
) -> Result<String, fmt::Error> {
    let printer = TablePrinter::new(options);
    tabbed_string(|out| printer.print_resources(resources, out))
}

// ============================================================================
// Rows
// ============================================================================

impl TableRow for Environment {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "VALUES"];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.values.len().to_string()]
    }
}

impl TableRow for Mock {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "COLLECTION", "ENVIRONMENT", "MOCK URL"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.collection.clone(),
            self.environment.clone(),
            self.mock_url.clone(),
        ]
    }
}

impl TableRow for Monitor {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "COLLECTION", "ENVIRONMENT"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.collection_uid.clone(),
            self.environment_uid.clone(),
        ]
    }
}

impl TableRow for Api {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "SUMMARY"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.summary.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for ApiVersion {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "API"];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.api.clone()]
    }
}

impl TableRow for Workspace {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "TYPE", "COLLECTIONS", "ENVIRONMENTS"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.workspace_type.clone(),
            self.collections.len().to_string(),
            self.environments.len().to_string(),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "USERNAME", "EMAIL"];

    fn row(&self) -> Vec<String> {
        // the API returns numeric ids for users
        let id = match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        vec![
            id,
            self.username.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for Schema {
    const HEADERS: &'static [&'static str] = &["ID", "TYPE", "LANGUAGE", "API VERSION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.schema_type.clone(),
            self.language.clone(),
            self.api_version.clone(),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
