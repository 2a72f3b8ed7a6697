pub use crate::span::Span;

declare_id!(SourceId);

/// A source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    id: SourceId,
    name: String,
    source: String,
    /// The start offset and length of each line.
    lines: Vec<(usize, usize)>,
}

impl SourceFile {
    pub fn new(id: SourceId, name: String, source: String) -> Self {
        let lines = source
            .split_inclusive('\n')
            .scan(0, |acc, line| {
                let start = *acc;
                *acc += line.len();
                let text = line.strip_suffix('\n').unwrap_or(line);
                let text = text.strip_suffix('\r').unwrap_or(text);
                Some((start, text.len()))
            })
            .collect();

        Self {
            id,
            name,
            source,
            lines,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the 1-based line and column of a byte offset.
    pub fn line_and_column(&self, offset: usize) -> (usize, usize) {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, (start, len))| offset >= *start && offset <= start + len)
            .map(|(i, (start, _))| (i + 1, offset - start + 1))
            .unwrap_or((1, 1))
    }

    /// Returns the text of a 1-based line number.
    pub fn line_str(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.lines
            .get(line - 1)
            .map(|&(start, len)| &self.source[start..start + len])
    }

    /// Returns the numbered lines touched by a span.
    pub fn lines_for_span(&self, span: &Span) -> Vec<(usize, &str)> {
        let (first, _) = self.line_and_column(span.start);
        let (last, _) = self.line_and_column(span.end);
        (first..=last)
            .filter_map(|line| self.line_str(line).map(|s| (line, s)))
            .collect()
    }
}

/// All sources seen by one compiler session.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.sources.get(id.raw)
    }

    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> SourceId {
        let id = SourceId::new(self.sources.len());
        self.sources
            .push(SourceFile::new(id, name.into(), source.into()));
        id
    }

    pub fn first(&self) -> Option<&SourceFile> {
        self.sources.first()
    }
}

impl<T: AsRef<str>> From<T> for SourceMap {
    fn from(s: T) -> Self {
        let mut sm = SourceMap::new();
        sm.add("<input>", s.as_ref());
        sm
    }
}
