use std::cell::RefCell;
use std::error::Error;
use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Writes command results as tables or JSON, and errors to the error stream.
pub struct Renderer {
    out: RefCell<Box<dyn Write>>,
    err: RefCell<Box<dyn Write>>,
    json: bool,
}

impl Renderer {
    pub fn new(out: impl Write + 'static, err: impl Write + 'static, json: bool) -> Self {
        Self {
            out: RefCell::new(Box::new(out)),
            err: RefCell::new(Box::new(err)),
            json,
        }
    }

    pub fn stdio(json: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), json)
    }

    pub fn table<R, C>(&self, headers: &[&str], rows: R) -> io::Result<()>
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row.into_iter().map(Into::into));
        }
        let table = builder.build().with(Style::rounded()).to_string();
        writeln!(self.out.borrow_mut(), "{table}")
    }

    /// Print a table or JSON depending on output mode
    pub fn list<T, F>(&self, items: &[T], headers: &[&str], to_row: F) -> io::Result<()>
    where
        T: Serialize,
        F: Fn(usize, &T) -> Vec<String>,
    {
        if self.json {
            return self.json_value(items);
        }
        self.table(headers, items.iter().enumerate().map(|(i, item)| to_row(i, item)))
    }

    /// Print a single item or JSON depending on output mode
    pub fn item<T: Serialize>(
        &self,
        item: &T,
        display: impl FnOnce(&Self) -> io::Result<()>,
    ) -> io::Result<()> {
        if self.json {
            self.json_value(item)
        } else {
            display(self)
        }
    }

    pub fn message(&self, message: &str) -> io::Result<()> {
        if self.json {
            self.json_value(&serde_json::json!({ "message": message }))
        } else {
            writeln!(self.out.borrow_mut(), "{message}")
        }
    }

    pub fn line(&self, text: &str) -> io::Result<()> {
        writeln!(self.out.borrow_mut(), "{text}")
    }

    pub fn error(&self, err: &dyn Error) {
        let mut stream = self.err.borrow_mut();
        // Nothing sensible left to do if stderr itself is gone.
        let _ = if self.json {
            writeln!(stream, "{}", serde_json::json!({ "error": err.to_string() }))
        } else {
            writeln!(stream, "{} {err}", "Error:".red().bold())
        };
    }

    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writeln!(self.out.borrow_mut(), "{text}")
    }
}
