//! Files for attachment tests.

/// A small text file
pub const NOTES_TXT: &[u8] = b"Kickoff notes\n- scope pilot\n- agree pricing\n";

/// Just enough of a PDF header for type sniffing by extension
pub const DECK_PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

/// Sample uploads as (file name, contents)
pub fn sample_uploads() -> [(&'static str, &'static [u8]); 2] {
    [("notes.txt", NOTES_TXT), ("pitch deck.pdf", DECK_PDF)]
}
