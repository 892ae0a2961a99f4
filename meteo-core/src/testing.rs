//! Test doubles shared by the unit tests.

use std::{cell::RefCell, collections::VecDeque};

use crate::{table::Table, ui::UserInterface};

/// Answers prompts from a script and records everything it is asked to show.
///
/// Once the script runs out every prompt is treated as cancelled.
#[derive(Debug, Default)]
pub(crate) struct ScriptedUi {
    answers: RefCell<VecDeque<String>>,
    headers: RefCell<Vec<String>>,
    messages: RefCell<Vec<String>>,
    prompts: RefCell<Vec<(String, Vec<String>)>>,
    tables: RefCell<Vec<Table>>,
}

impl ScriptedUi {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub(crate) fn headers(&self) -> Vec<String> {
        self.headers.borrow().clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub(crate) fn prompts(&self) -> Vec<(String, Vec<String>)> {
        self.prompts.borrow().clone()
    }

    pub(crate) fn tables(&self) -> Vec<Table> {
        self.tables.borrow().clone()
    }
}

impl UserInterface for ScriptedUi {
    fn display_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn display_header(&self, header: &str) {
        self.headers.borrow_mut().push(header.to_string());
    }

    fn display_table(&self, table: &Table, max_rows: usize) {
        self.tables.borrow_mut().push(table.head(max_rows));
    }

    fn prompt_for_choice(&self, choices: &[String], prompt: &str) -> Option<String> {
        self.prompts
            .borrow_mut()
            .push((prompt.to_string(), choices.to_vec()));

        if choices.is_empty() {
            return None;
        }
        self.answers.borrow_mut().pop_front()
    }
}
