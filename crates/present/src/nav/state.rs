/// Role of a slide relative to the one on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    BeforePrev,
    Prev,
    Current,
    Next,
    AfterNext,
}

impl SlideState {
    /// Class name used when styling the slide.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::BeforePrev => "before-prev",
            Self::Prev => "prev",
            Self::Current => "current",
            Self::Next => "next",
            Self::AfterNext => "after-next",
        }
    }

    /// Horizontal slot relative to the current slide, in slide widths.
    pub fn offset(self) -> i32 {
        match self {
            Self::BeforePrev => -2,
            Self::Prev => -1,
            Self::Current => 0,
            Self::Next => 1,
            Self::AfterNext => 2,
        }
    }

    fn from_offset(offset: i64) -> Option<Self> {
        match offset {
            -2 => Some(Self::BeforePrev),
            -1 => Some(Self::Prev),
            0 => Some(Self::Current),
            1 => Some(Self::Next),
            2 => Some(Self::AfterNext),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlideState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Compute the label of every slide when `target` is shown out of `count`.
///
/// A target past the end leaves every slide unlabelled.
pub fn labels(target: usize, count: usize) -> Vec<Option<SlideState>> {
    if target >= count {
        return vec![None; count];
    }
    (0..count)
        .map(|i| SlideState::from_offset(i as i64 - target as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_middle() {
        let l = labels(3, 7);
        assert_eq!(
            l,
            vec![
                None,
                Some(SlideState::BeforePrev),
                Some(SlideState::Prev),
                Some(SlideState::Current),
                Some(SlideState::Next),
                Some(SlideState::AfterNext),
                None,
            ]
        );
    }

    #[test]
    fn test_labels_first_slide() {
        let l = labels(0, 4);
        assert_eq!(
            l,
            vec![
                Some(SlideState::Current),
                Some(SlideState::Next),
                Some(SlideState::AfterNext),
                None,
            ]
        );
    }

    #[test]
    fn test_labels_last_slide() {
        let l = labels(2, 3);
        assert_eq!(
            l,
            vec![
                Some(SlideState::BeforePrev),
                Some(SlideState::Prev),
                Some(SlideState::Current),
            ]
        );
    }

    #[test]
    fn test_labels_past_end_clears_all() {
        assert!(labels(3, 3).iter().all(Option::is_none));
        assert!(labels(100, 3).iter().all(Option::is_none));
        assert!(labels(0, 0).is_empty());
    }

    #[test]
    fn test_exactly_one_current_for_every_valid_index() {
        for count in 1..8 {
            for i in 0..count {
                let l = labels(i, count);
                let current: Vec<usize> = l
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| **s == Some(SlideState::Current))
                    .map(|(idx, _)| idx)
                    .collect();
                assert_eq!(current, vec![i]);
                if i > 0 {
                    assert_eq!(l[i - 1], Some(SlideState::Prev));
                }
                if i + 1 < count {
                    assert_eq!(l[i + 1], Some(SlideState::Next));
                }
            }
        }
    }

    #[test]
    fn test_class_names() {
        assert_eq!(SlideState::AfterNext.to_string(), "after-next");
        assert_eq!(SlideState::BeforePrev.class_name(), "before-prev");
    }
}
