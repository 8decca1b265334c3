use std::collections::BTreeMap;
use std::fmt;

/// Occurrence bounds for one file-type field inside a [`FileGroup`].
#[derive(Clone, Debug)]
pub struct FileCount {
    name: String,
    min: u32,
    max: Option<u32>,
}

impl FileCount {
    /// Exactly `count` files.
    pub fn exactly(name: &str, count: u32) -> Self {
        FileCount {
            name: name.to_uppercase(),
            min: count,
            max: Some(count),
        }
    }

    /// At least `min` files, no upper bound.
    pub fn at_least(name: &str, min: u32) -> Self {
        FileCount {
            name: name.to_uppercase(),
            min,
            max: None,
        }
    }

    /// Between `min` and `max` files inclusive.
    pub fn between(name: &str, min: u32, max: u32) -> Self {
        assert!(max >= min, "file count '{name}': maximum {max} is below minimum {min}");
        FileCount {
            name: name.to_uppercase(),
            min,
            max: Some(max),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    fn accepts(&self, count: usize) -> bool {
        count as u64 >= u64::from(self.min)
            && self.max.map_or(true, |max| count as u64 <= u64::from(max))
    }
}

impl fmt::Display for FileCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{} \"{}\" file(s)", self.min, self.name),
            Some(max) => write!(f, "{}-{} \"{}\" file(s)", self.min, max, self.name),
            None => write!(f, ">={} \"{}\" file(s)", self.min, self.name),
        }
    }
}

/// One complete, self-consistent combination of file types a submission may
/// supply. A manifest's file fields must satisfy exactly one declared group;
/// the first declared group that matches wins.
#[derive(Clone, Debug)]
pub struct FileGroup {
    name: String,
    counts: Vec<FileCount>,
}

impl FileGroup {
    pub fn new(name: &str) -> Self {
        FileGroup {
            name: name.to_string(),
            counts: Vec::new(),
        }
    }

    pub fn with(mut self, count: FileCount) -> Self {
        self.counts.push(count);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counts(&self) -> &[FileCount] {
        &self.counts
    }

    /// Whether the observed per-type file counts satisfy this group: every
    /// declared bound holds (absence is fine when the minimum is zero) and no
    /// observed file type falls outside the group.
    pub fn matches(&self, present: &BTreeMap<String, usize>) -> bool {
        let bounds_hold = self
            .counts
            .iter()
            .all(|count| count.accepts(present.get(count.name()).copied().unwrap_or(0)));
        let no_strays = present
            .keys()
            .all(|name| self.counts.iter().any(|count| count.name() == name));
        bounds_hold && no_strays
    }
}

impl fmt::Display for FileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, count) in self.counts.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{count}")?;
        }
        write!(f, "]")
    }
}

/// Render the declared groups for "expected one of" diagnostics.
pub fn render_expected(groups: &[FileGroup]) -> String {
    groups
        .iter()
        .map(FileGroup::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}
