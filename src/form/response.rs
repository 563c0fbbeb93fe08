use serde::{Deserialize, Serialize};

use crate::domain::Person;

/// One question/answer pair of the submitted-document transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseEntry {
    pub question: String,
    pub answer: String,
}

/// Ordered question-text to answer-text transcript for a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Response(Vec<ResponseEntry>);

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing the answer if the question is already present.
    pub fn add(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer = answer.into();
        match self.0.iter_mut().find(|entry| entry.question == question) {
            Some(entry) => entry.answer = answer,
            None => self.0.push(ResponseEntry { question, answer }),
        }
    }

    pub fn with(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.add(question, answer);
        self
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.question == question)
            .map(|entry| entry.answer.as_str())
    }

    pub fn entries(&self) -> &[ResponseEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Strips a withheld name from both questions and answers.
    pub fn anonymised(self, person: &Person) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|entry| ResponseEntry {
                    question: person.anonymise(&entry.question),
                    answer: person.anonymise(&entry.answer),
                })
                .collect(),
        )
    }
}
