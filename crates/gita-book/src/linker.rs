//! Previous/next navigation links.
//!
//! Links are derived from position alone: numbering gaps or out-of-order
//! numbers in the dataset are not detected and produce links that point to
//! the wrong place.

use crate::book::{Book, Chapter, VerseRef};

/// Populate previous/next links on every chapter and verse of `book`.
///
/// Chapter links are the neighbouring chapter numbers, with `0` at either end
/// of the book. Verse links default to the neighbouring verse in the same
/// chapter. The first verse of a chapter points back to the last verse of the
/// preceding chapter and the last verse points forward to verse 1 of the next
/// chapter. The very first and very last verse of the book get
/// [`VerseRef::NONE`].
///
/// The previous side and the next side are resolved independently, so a
/// chapter with a single verse links both ways.
pub fn link(book: &mut Book) {
    let last_chapter = book.chapters.len().saturating_sub(1);

    // (number, last verse number) of the chapter before the current one.
    let mut preceding: Option<(u32, u32)> = None;

    for (chapter_idx, chapter) in book.chapters.iter_mut().enumerate() {
        let is_first_chapter = chapter_idx == 0;
        let is_last_chapter = chapter_idx == last_chapter;

        chapter.previous_chapter = if is_first_chapter {
            0
        } else {
            chapter.number.saturating_sub(1)
        };
        chapter.next_chapter = if is_last_chapter {
            0
        } else {
            chapter.number.saturating_add(1)
        };

        link_verses(chapter, preceding, is_last_chapter);
        preceding = Some((chapter.number, chapter.last_verse_number()));
    }
}

fn link_verses(chapter: &mut Chapter, preceding: Option<(u32, u32)>, is_last_chapter: bool) {
    let number = chapter.number;
    let last_verse = chapter.verses.len().saturating_sub(1);

    for (verse_idx, verse) in chapter.verses.iter_mut().enumerate() {
        verse.previous_verse = if verse_idx == 0 {
            match preceding {
                // Very first verse of the book
                None => VerseRef::NONE,
                Some((c, v)) => VerseRef::new(c, v),
            }
        } else {
            VerseRef::new(number, verse.number.saturating_sub(1))
        };

        verse.next_verse = if verse_idx == last_verse {
            if is_last_chapter {
                // Very last verse of the book
                VerseRef::NONE
            } else {
                VerseRef::new(number.saturating_add(1), 1)
            }
        } else {
            VerseRef::new(number, verse.number.saturating_add(1))
        };
    }
}
