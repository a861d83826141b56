use anyhow::Result;
use text_splitter::{Characters, ChunkConfig, TextSplitter};

use super::loader::Page;
use super::Chunk;

pub const CHUNK_SIZE: usize = 1000;
pub const CHUNK_OVERLAP: usize = 100;

/// Splits every page on blank lines first; only paragraphs longer than
/// `CHUNK_SIZE` characters go through the recursive splitter.
pub fn split_pages(pages: &[Page]) -> Result<Vec<Chunk>> {
    let config = ChunkConfig::new(CHUNK_SIZE)
        .with_sizer(Characters)
        .with_overlap(CHUNK_OVERLAP)?
        .with_trim(true);
    let splitter = TextSplitter::new(config);

    let mut chunks = Vec::new();
    for page in pages {
        for paragraph in page.text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            let chunk = |text: &str| Chunk {
                text: text.to_string(),
                source: page.source.clone(),
                page: page.number,
            };
            if paragraph.chars().count() > CHUNK_SIZE {
                chunks.extend(splitter.chunks(paragraph).map(chunk));
            } else {
                chunks.push(chunk(paragraph));
            }
        }
    }

    tracing::info!("Split {} pages into {} chunks", pages.len(), chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> Page {
        Page {
            source: "Data/encyclopedia.pdf".to_string(),
            number: 3,
            text: text.to_string(),
        }
    }

    #[test]
    fn paragraphs_become_chunks() {
        let chunks = split_pages(&[page(
            "Anemia is a condition.\n\n  \n\nSymptoms include fatigue.\n\n",
        )])
        .unwrap();

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Anemia is a condition.", "Symptoms include fatigue."]);
        assert!(chunks
            .iter()
            .all(|c| c.source == "Data/encyclopedia.pdf" && c.page == 3));
    }

    #[test]
    fn long_paragraphs_are_split_to_size() {
        let sentence = "Hypertension raises the risk of stroke and heart disease. ";
        let long = sentence.repeat(60);

        let chunks = split_pages(&[page(&long)]).unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= CHUNK_SIZE));
        assert!(chunks[0].text.starts_with("Hypertension"));
    }

    #[test]
    fn empty_pages_give_nothing() {
        assert!(split_pages(&[page(""), page("\n\n\n")]).unwrap().is_empty());
    }
}
