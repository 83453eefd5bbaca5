/// Tracks whether we are inside a fenced code block.
///
/// A fence opens with three or more backticks or tildes and closes on a line
/// of the same character at least as long, with nothing else after it.
#[derive(Debug, Default)]
pub struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns true if the line belongs to a code block,
    /// including its opening and closing fences.
    pub fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if let Some((fence_char, fence_len)) = self.open {
            let closing_count = trimmed.chars().take_while(|&c| c == fence_char).count();
            if closing_count >= fence_len
                && trimmed
                    .chars()
                    .skip(closing_count)
                    .all(|c| c.is_whitespace())
            {
                self.open = None;
            }
            return true;
        }
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            let fence_char = if trimmed.starts_with('`') { '`' } else { '~' };
            let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();
            self.open = Some((fence_char, fence_len));
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut fence = Fence::default();
        assert!(!fence.update("text"));
        assert!(fence.update("```go"));
        assert!(fence.is_open());
        assert!(fence.update("## inside"));
        assert!(fence.update("```"));
        assert!(!fence.is_open());
        assert!(!fence.update("after"));
    }

    #[test]
    fn test_shorter_or_other_fence_does_not_close() {
        let mut fence = Fence::default();
        fence.update("````");
        fence.update("```");
        fence.update("~~~~");
        assert!(fence.is_open());
        fence.update("`````");
        assert!(!fence.is_open());
    }

    #[test]
    fn test_closing_fence_with_info_stays_open() {
        let mut fence = Fence::default();
        fence.update("~~~");
        fence.update("~~~ rust");
        assert!(fence.is_open());
    }
}
