//! Output sink used by `print` statements.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Receives the fragments of one printed line.
pub trait Printer {
    fn print(&mut self, fragments: &[&str]);
}

/// Default sink: one line on standard output per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&mut self, fragments: &[&str]) {
        let mut out = io::stdout().lock();

        // A closed stdout is not the script's problem.
        let _ = writeln!(out, "{}", fragments.concat());
    }
}

/// Collects printed lines in memory.  Clones share the same buffer, so one
/// clone can be handed to the interpreter while another is read back.
#[derive(Debug, Default, Clone)]
pub struct BufferPrinter {
    lines: Rc<RefCell<Vec<String>>>,
}

impl BufferPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Printer for BufferPrinter {
    fn print(&mut self, fragments: &[&str]) {
        self.lines.borrow_mut().push(fragments.concat());
    }
}
