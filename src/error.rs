// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for Count-Min sketch operations

use std::fmt;

/// ErrorKind is all kinds of Error of this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The config for a sketch is invalid.
    ConfigInvalid,
    /// A subtraction would drive a counter below zero.
    CounterUnderflow,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::CounterUnderflow => "CounterUnderflow",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all fallible sketch functions.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
        }
    }

    /// Add more context in error.
    ///
    /// # Examples
    ///
    /// ```
    /// use countmin::error::Error;
    /// use countmin::error::ErrorKind;
    ///
    /// let error = Error::new(ErrorKind::ConfigInvalid, "width must be at least 1")
    ///     .with_context("width", 0);
    /// assert_eq!(error.context(), &[("width", "0".to_string())]);
    /// ```
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the key/value context attached to this error, in insertion order.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    pub(crate) fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub(crate) fn counter_underflow(row: usize, bucket: usize) -> Self {
        Self::new(
            ErrorKind::CounterUnderflow,
            "subtracted sketch holds more weight than the receiver",
        )
        .with_context("row", row)
        .with_context("bucket", bucket)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            let context = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, ", context: {{ {context} }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context_and_message() {
        let error = Error::counter_underflow(2, 17);
        assert_eq!(error.kind(), ErrorKind::CounterUnderflow);
        assert_eq!(
            error.to_string(),
            "CounterUnderflow, context: { row: 2, bucket: 17 } => \
             subtracted sketch holds more weight than the receiver"
        );
    }

    #[test]
    fn test_display_without_context() {
        let error = Error::config_invalid("depth must be at least 1");
        assert_eq!(error.to_string(), "ConfigInvalid => depth must be at least 1");
    }

    #[test]
    fn test_debug_lists_context() {
        let error = Error::config_invalid("seed count does not match depth")
            .with_context("depth", 4)
            .with_context("seeds", 3);
        let debug = format!("{error:?}");
        assert!(debug.starts_with("ConfigInvalid => seed count does not match depth\n"));
        assert!(debug.contains("   depth: 4\n"));
        assert!(debug.contains("   seeds: 3\n"));

        let alternate = format!("{error:#?}");
        assert!(alternate.starts_with("Error {"));
    }
}
