//! Book, chapter and verse types.
//!
//! Field names on the wire follow the dataset format (`Num`, `Verses`,
//! `SynonymsSanskrit`, ...). Navigation links are never read from the
//! dataset; they are derived by [`link`](crate::link) after loading.

use serde::Deserialize;

/// Reference to a verse by chapter and verse number.
///
/// `(0, 0)` is the sentinel for "no such verse" at either end of the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VerseRef {
    /// Chapter number (1-based).
    pub chapter: u32,
    /// Verse number within the chapter (1-based).
    pub verse: u32,
}

impl VerseRef {
    /// Sentinel marking the start or end of the book.
    pub const NONE: Self = Self {
        chapter: 0,
        verse: 0,
    };

    #[must_use]
    pub const fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }

    /// True for the `(0, 0)` sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.chapter == 0 && self.verse == 0
    }

    /// The reference itself, or `None` when it names no verse (the
    /// sentinel, or verse 0 after an empty chapter).
    #[must_use]
    pub const fn get(self) -> Option<Self> {
        if self.verse == 0 { None } else { Some(self) }
    }
}

/// A single verse with its text, commentary and navigation links.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Verse {
    /// Verse number within its chapter (1-based).
    #[serde(rename = "Num")]
    pub number: u32,
    /// Lines in Devanāgarī script.
    pub devanagari: Vec<String>,
    /// Per-word audio timings for the Devanāgarī lines.
    pub devanagari_word_timings: Vec<f32>,
    /// IAST transliteration lines.
    #[serde(rename = "IAST")]
    pub iast: Vec<String>,
    /// Per-word audio timings for the IAST lines.
    #[serde(rename = "IASTWordTimings")]
    pub iast_word_timings: Vec<f32>,
    /// Sanskrit halves of the word-for-word synonyms.
    pub synonyms_sanskrit: Vec<String>,
    /// Translated halves of the word-for-word synonyms.
    pub synonyms_translation: Vec<String>,
    /// Verse translation (HTML fragment).
    pub translation: String,
    /// Commentary paragraphs (HTML fragments).
    pub purport: Vec<String>,
    /// Previous verse in reading order.
    #[serde(skip)]
    pub previous_verse: VerseRef,
    /// Next verse in reading order.
    #[serde(skip)]
    pub next_verse: VerseRef,
}

impl Verse {
    /// Create an empty verse with the given number.
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Word-for-word synonym pairs `(sanskrit, translation)`.
    ///
    /// Entries without a counterpart in the other list are dropped.
    pub fn synonyms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.synonyms_sanskrit
            .iter()
            .zip(&self.synonyms_translation)
            .map(|(word, meaning)| (word.as_str(), meaning.as_str()))
    }
}

/// A numbered chapter owning its verses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Chapter {
    /// Chapter number (1-based).
    #[serde(rename = "Num")]
    pub number: u32,
    /// Display name.
    pub name: String,
    /// Verses in ascending number order.
    pub verses: Vec<Verse>,
    /// Previous chapter number, 0 for the first chapter.
    #[serde(skip)]
    pub previous_chapter: u32,
    /// Next chapter number, 0 for the last chapter.
    #[serde(skip)]
    pub next_chapter: u32,
}

impl Chapter {
    /// Create a chapter with the given number, name and verses.
    #[must_use]
    pub fn new(number: u32, name: impl Into<String>, verses: Vec<Verse>) -> Self {
        Self {
            number,
            name: name.into(),
            verses,
            previous_chapter: 0,
            next_chapter: 0,
        }
    }

    /// Number of the last verse, 0 for an empty chapter.
    #[must_use]
    pub fn last_verse_number(&self) -> u32 {
        self.verses.last().map_or(0, |v| v.number)
    }

    /// Previous chapter number, or `None` at the start of the book.
    #[must_use]
    pub fn previous(&self) -> Option<u32> {
        (self.previous_chapter != 0).then_some(self.previous_chapter)
    }

    /// Next chapter number, or `None` at the end of the book.
    #[must_use]
    pub fn next(&self) -> Option<u32> {
        (self.next_chapter != 0).then_some(self.next_chapter)
    }

    /// Look up a verse by its 1-based number.
    pub fn verse(&self, number: u32) -> Result<&Verse, LookupError> {
        let not_found = || LookupError::VerseNotFound {
            chapter: self.number,
            verse: number,
        };
        let idx = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(not_found)?;
        self.verses.get(idx).ok_or_else(not_found)
    }
}

/// The complete work.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Book {
    /// Preface text.
    pub preface: String,
    /// Introduction text.
    pub introduction: String,
    /// Chapters in ascending number order.
    pub chapters: Vec<Chapter>,
}

/// Error returned when a chapter or verse number is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No chapter with this number.
    #[error("Chapter {0} does not exist!")]
    ChapterNotFound(u32),
    /// No verse with this number in the chapter.
    #[error("Verse {chapter}.{verse} does not exist!")]
    VerseNotFound {
        /// Requested chapter number.
        chapter: u32,
        /// Requested verse number.
        verse: u32,
    },
}

impl Book {
    /// Create a linked book from chapters.
    ///
    /// Chapters are expected in ascending number order.
    #[must_use]
    pub fn from_chapters(chapters: Vec<Chapter>) -> Self {
        let mut book = Self {
            preface: String::new(),
            introduction: String::new(),
            chapters,
        };
        crate::link(&mut book);
        book
    }

    /// Number of chapters.
    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Total number of verses across all chapters.
    #[must_use]
    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }

    /// Look up a chapter by its 1-based number.
    pub fn chapter(&self, number: u32) -> Result<&Chapter, LookupError> {
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.chapters.get(idx))
            .ok_or(LookupError::ChapterNotFound(number))
    }

    /// Look up a verse by chapter and verse number.
    pub fn verse(&self, chapter: u32, verse: u32) -> Result<&Verse, LookupError> {
        self.chapter(chapter)?.verse(verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: u32, verses: u32) -> Chapter {
        Chapter::new(
            number,
            format!("Chapter {number}"),
            (1..=verses).map(Verse::new).collect(),
        )
    }

    #[test]
    fn test_verse_ref_sentinel() {
        assert!(VerseRef::NONE.is_none());
        assert_eq!(VerseRef::NONE.get(), None);
        assert_eq!(VerseRef::new(2, 1).get(), Some(VerseRef::new(2, 1)));
        assert!(!VerseRef::new(0, 1).is_none());
        assert_eq!(VerseRef::new(3, 0).get(), None);
    }

    #[test]
    fn test_chapter_lookup() {
        let book = Book::from_chapters(vec![chapter(1, 3), chapter(2, 2)]);

        assert_eq!(book.chapter(1).unwrap().name, "Chapter 1");
        assert_eq!(book.chapter(2).unwrap().verses.len(), 2);
    }

    #[test]
    fn test_chapter_lookup_out_of_range() {
        let book = Book::from_chapters(vec![chapter(1, 3), chapter(2, 2)]);

        assert_eq!(book.chapter(0), Err(LookupError::ChapterNotFound(0)));
        assert_eq!(book.chapter(3), Err(LookupError::ChapterNotFound(3)));
        assert_eq!(
            book.chapter(u32::MAX),
            Err(LookupError::ChapterNotFound(u32::MAX))
        );
    }

    #[test]
    fn test_verse_lookup() {
        let book = Book::from_chapters(vec![chapter(1, 3), chapter(2, 2)]);

        let verse = book.verse(1, 3).unwrap();

        assert_eq!(verse.number, 3);
        assert_eq!(verse.next_verse, VerseRef::new(2, 1));
    }

    #[test]
    fn test_verse_zero_does_not_exist() {
        let book = Book::from_chapters(vec![chapter(1, 3)]);

        let err = book.verse(1, 0).unwrap_err();

        assert_eq!(
            err,
            LookupError::VerseNotFound {
                chapter: 1,
                verse: 0
            }
        );
        assert_eq!(err.to_string(), "Verse 1.0 does not exist!");
    }

    #[test]
    fn test_verse_past_end_does_not_exist() {
        let book = Book::from_chapters(vec![chapter(1, 3)]);

        assert!(matches!(
            book.verse(1, 4),
            Err(LookupError::VerseNotFound { verse: 4, .. })
        ));
    }

    #[test]
    fn test_verse_in_missing_chapter_reports_chapter() {
        let book = Book::from_chapters(vec![chapter(1, 3)]);

        let err = book.verse(19, 1).unwrap_err();

        assert_eq!(err.to_string(), "Chapter 19 does not exist!");
    }

    #[test]
    fn test_counts() {
        let book = Book::from_chapters(vec![chapter(1, 3), chapter(2, 2)]);

        assert_eq!(book.chapter_count(), 2);
        assert_eq!(book.verse_count(), 5);
        assert_eq!(book.chapter(1).unwrap().last_verse_number(), 3);
        assert_eq!(Chapter::new(3, "Empty", vec![]).last_verse_number(), 0);
    }

    #[test]
    fn test_synonyms_pairs_drop_unmatched() {
        let verse = Verse {
            synonyms_sanskrit: vec!["dharma".to_owned(), "kṣetre".to_owned()],
            synonyms_translation: vec!["religion".to_owned()],
            ..Verse::new(1)
        };

        let pairs: Vec<_> = verse.synonyms().collect();

        assert_eq!(pairs, vec![("dharma", "religion")]);
    }

    #[test]
    fn test_deserialize_dataset_field_names() {
        let json = r#"{
            "Num": 7,
            "Devanagari": ["धर्मक्षेत्रे"],
            "IAST": ["dharma-kṣetre"],
            "IASTWordTimings": [0.5, 1.25],
            "SynonymsSanskrit": ["dharma-kṣetre"],
            "SynonymsTranslation": ["in the place of pilgrimage"],
            "Translation": "<b>Dhṛtarāṣṭra</b> said",
            "Purport": ["first", "second"]
        }"#;

        let verse: Verse = serde_json::from_str(json).unwrap();

        assert_eq!(verse.number, 7);
        assert_eq!(verse.devanagari, vec!["धर्मक्षेत्रे"]);
        assert_eq!(verse.iast_word_timings, vec![0.5, 1.25]);
        assert!(verse.devanagari_word_timings.is_empty());
        assert_eq!(verse.purport.len(), 2);
        assert_eq!(verse.previous_verse, VerseRef::NONE);
    }
}
