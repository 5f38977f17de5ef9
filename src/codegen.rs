//! Serialization of a [`Program`] into source lines, and the `dump`/`dumps`
//! entry points running the whole conversion.

use crate::ast::{Objects, Program, Statement};
use crate::compiler::{Compilation, Compiler};
use crate::error::{ConversionError, RenderError};
use crate::scenario::scan;
use crate::session::{DEFAULT_DENYLIST_FILE, Denylist};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// A lazy stream of output lines, rendering one top-level statement at a
/// time. Top-level statements are separated by a blank line.
///
/// The stream stops after the first error. To go through a program twice,
/// clone it first.
#[derive(Debug)]
pub struct Lines {
    statements: std::vec::IntoIter<Statement>,
    objects: Objects,
    pending: VecDeque<String>,
    started: bool,
    failed: bool,
}

impl Lines {
    pub fn new(program: Program) -> Self {
        let (statements, objects) = program.into_parts();
        Self {
            statements: statements.into_iter(),
            objects,
            pending: VecDeque::new(),
            started: false,
            failed: false,
        }
    }
}

impl Iterator for Lines {
    type Item = Result<String, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.pending.is_empty() {
            let statement = self.statements.next()?;
            match statement.lines(0, &self.objects) {
                Ok(lines) => {
                    if self.started && !lines.is_empty() {
                        self.pending.push_back(String::new());
                    }
                    self.started |= !lines.is_empty();
                    self.pending.extend(lines.iter().map(ToString::to_string));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        self.pending.pop_front().map(Ok)
    }
}

impl Program {
    /// Consumes the program into its lazy line stream.
    pub fn into_lines(self) -> Lines {
        Lines::new(self)
    }
}

/// Scans `paths` and compiles them into a program.
/// The denylist is read from `.urlignore` in the working directory.
pub fn convert<P, S>(
    paths: &[P],
    plugins: &[S],
    with_default_plugins: bool,
) -> Result<Compilation, ConversionError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    convert_with_denylist(
        paths,
        plugins,
        with_default_plugins,
        Denylist::from_file(Path::new(DEFAULT_DENYLIST_FILE)),
    )
}

pub fn convert_with_denylist<P, S>(
    paths: &[P],
    plugins: &[S],
    with_default_plugins: bool,
    denylist: Denylist,
) -> Result<Compilation, ConversionError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let compiler = Compiler::builder(Default::default())
        .with_plugins(plugins.iter().map(|p| p.as_ref().to_string()))
        .with_default_plugins(with_default_plugins)
        .with_denylist(denylist)
        .build()?;
    let scanned = scan(paths)?;
    let compiler = compiler.with_listing(scanned.listing);
    let mut compilation = compiler.compile()?;
    for skip in &scanned.skipped {
        warn!(path = %skip.path.display(), reason = %skip.reason, "Skipped input");
    }
    let mut skipped = scanned.skipped;
    skipped.append(&mut compilation.skipped);
    compilation.skipped = skipped;
    Ok(compilation)
}

/// Renders every line of `program`, failing on the first placeholder that
/// cannot be rendered.
pub fn render(program: Program) -> Result<Vec<String>, RenderError> {
    program.into_lines().collect()
}

/// Converts `paths` and returns the program as one string, lines joined by
/// `\n`.
pub fn dumps<P, S>(
    paths: &[P],
    plugins: &[S],
    with_default_plugins: bool,
) -> Result<String, ConversionError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let compilation = convert(paths, plugins, with_default_plugins)?;
    Ok(render(compilation.program)?.join("\n"))
}

/// Converts `paths` and writes the program to `writer`.
///
/// Nothing is written unless the whole program renders: a failed conversion
/// never leaves half a program behind.
pub fn dump<W, P, S>(
    writer: &mut W,
    paths: &[P],
    plugins: &[S],
    with_default_plugins: bool,
) -> Result<(), ConversionError>
where
    W: Write,
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let compilation = convert(paths, plugins, with_default_plugins)?;
    write_program(writer, compilation.program)
}

/// Renders `program` in full, then writes it; no newline after the last line.
pub fn write_program<W: Write>(writer: &mut W, program: Program) -> Result<(), ConversionError> {
    let lines = render(program)?;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n")?;
        }
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
