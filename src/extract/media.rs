/// Records `@media` condition text in encounter order.
///
/// Duplicates are kept: the list doubles as a count of media blocks.
#[derive(Clone, Debug, Default)]
pub struct MediaCollector {
	medias: Vec<String>,
}

impl MediaCollector {
	/// Record one `@media` block.
	pub fn push(&mut self, condition: &str) {
		self.medias.push(condition.to_string());
	}

	/// Distinct conditions with how often each appeared, first-seen order.
	pub fn distinct(&self) -> Vec<(&str, usize)> {
		let mut out: Vec<(&str, usize)> = Vec::new();
		for media in &self.medias {
			match out.iter_mut().find(|(seen, _)| *seen == media.as_str()) {
				Some((_, count)) => *count += 1,
				None => out.push((media.as_str(), 1)),
			}
		}
		out
	}

	/// Every condition in encounter order.
	pub fn into_inner(self) -> Vec<String> {
		self.medias
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_duplicates_and_counts_them() {
		let mut medias = MediaCollector::default();
		for condition in ["(max-width: 600px)", "print", "(max-width: 600px)"] {
			medias.push(condition);
		}
		assert_eq!(medias.distinct(), vec![("(max-width: 600px)", 2), ("print", 1)]);
		assert_eq!(
			medias.into_inner(),
			vec!["(max-width: 600px)", "print", "(max-width: 600px)"]
		);
	}
}
