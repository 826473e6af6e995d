/*
Wristwatch - Wrist Watch HUD
*/
use std::collections::VecDeque;

/// How Many Lines Fit on the Watch Face
pub const CHAT_CAPACITY: usize = 8;

/// Most Recent Distinct Chat Lines, Oldest First
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    lines: VecDeque<String>,
}

impl ChatLog {
    /// Returns 'false' (and Changes Nothing) if the Exact Text is Already Buffered
    pub fn push(&mut self, msg: impl Into<String>) -> bool {
        let msg = msg.into();
        if self.contains(&msg) {
            return false;
        }
        self.lines.push_back(msg);
        while self.lines.len() > CHAT_CAPACITY {
            self.lines.pop_front();
        }
        true
    }

    pub fn contains(&self, msg: &str) -> bool {
        self.lines.iter().any(|l| l == msg)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// One Line per Message, Newest Last
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
