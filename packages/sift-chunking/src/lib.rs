pub use tokenizers::Tokenizer;

use unicode_segmentation::UnicodeSegmentation;

pub type TokenizerError = tokenizers::Error;

/// Counts model tokens in a piece of text.
pub trait TokenCounter: Send + Sync {
	fn count_tokens(&self, text: &str) -> usize;
}
impl TokenCounter for Tokenizer {
	fn count_tokens(&self, text: &str) -> usize {
		match self.encode(text, false) {
			Ok(encoding) => encoding.len(),
			Err(err) => {
				tracing::error!(error = %err, "Tokenizer failed to encode sentence.");

				0
			},
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct ChunkingConfig {
	pub max_tokens: u32,
	pub overlap_tokens: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
	pub chunk_index: u32,
	/// Byte offsets into the source text.
	pub start_offset: usize,
	pub end_offset: usize,
	pub text: String,
}

struct Sentence {
	start: usize,
	end: usize,
	tokens: usize,
}

pub struct Chunker<C> {
	counter: C,
	cfg: ChunkingConfig,
}
impl<C> Chunker<C>
where
	C: TokenCounter,
{
	pub fn new(counter: C, cfg: ChunkingConfig) -> Self {
		Self { counter, cfg }
	}

	/// Packs whole sentences into chunks of at most `max_tokens`.
	///
	/// Consecutive chunks share trailing sentences worth up to `overlap_tokens`. A sentence larger
	/// than `max_tokens` becomes a chunk of its own.
	pub fn split(&self, text: &str) -> Vec<Chunk> {
		let sentences: Vec<Sentence> = text
			.split_sentence_bound_indices()
			.map(|(start, sentence)| Sentence {
				start,
				end: start + sentence.len(),
				tokens: self.counter.count_tokens(sentence),
			})
			.collect();
		let max_tokens = self.cfg.max_tokens as usize;
		let mut chunks = Vec::new();
		let mut window: Vec<&Sentence> = Vec::new();
		let mut window_tokens = 0_usize;

		for sentence in &sentences {
			if !window.is_empty() && window_tokens + sentence.tokens > max_tokens {
				push_chunk(text, &window, &mut chunks);

				window = self.overlap(&window, sentence.tokens);
				window_tokens = window.iter().map(|s| s.tokens).sum();
			}

			window.push(sentence);

			window_tokens += sentence.tokens;
		}

		push_chunk(text, &window, &mut chunks);

		chunks
	}

	fn overlap<'a>(&self, window: &[&'a Sentence], next_tokens: usize) -> Vec<&'a Sentence> {
		let budget = (self.cfg.overlap_tokens as usize)
			.min((self.cfg.max_tokens as usize).saturating_sub(next_tokens));
		let mut kept = 0_usize;
		let mut start = window.len();

		// The full window was just emitted, so at least one sentence is always dropped.
		while start > 1 {
			let tokens = window[start - 1].tokens;

			if kept + tokens > budget {
				break;
			}

			kept += tokens;
			start -= 1;
		}

		window[start..].to_vec()
	}
}

pub fn load_tokenizer(repo: &str) -> Result<Tokenizer, TokenizerError> {
	Tokenizer::from_pretrained(repo, None)
}

fn push_chunk(text: &str, window: &[&Sentence], chunks: &mut Vec<Chunk>) {
	let (Some(first), Some(last)) = (window.first(), window.last()) else {
		return;
	};
	let slice = &text[first.start..last.end];

	if slice.trim().is_empty() {
		return;
	}

	chunks.push(Chunk {
		chunk_index: chunks.len() as u32,
		start_offset: first.start,
		end_offset: last.end,
		text: slice.to_string(),
	});
}
