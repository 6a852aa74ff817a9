use log::warn;

use crate::host::{RuleEntry, SheetSource};

/// Lazily walks every readable stylesheet, yielding its rules in order.
///
/// Sheets the host could not enumerate are skipped with a warning.
pub struct RuleScanner {
	sheets: std::vec::IntoIter<SheetSource>,
	current: std::vec::IntoIter<RuleEntry>,
	skipped: usize,
}

impl RuleScanner {
	/// Scan `sheets` in document order.
	pub fn new(sheets: Vec<SheetSource>) -> Self {
		Self {
			sheets: sheets.into_iter(),
			current: Vec::new().into_iter(),
			skipped: 0,
		}
	}

	/// Number of sheets skipped so far.
	pub fn skipped(&self) -> usize {
		self.skipped
	}
}

impl Iterator for RuleScanner {
	type Item = RuleEntry;

	fn next(&mut self) -> Option<RuleEntry> {
		loop {
			if let Some(rule) = self.current.next() {
				return Some(rule);
			}
			let sheet = self.sheets.next()?;
			match sheet.rules {
				Ok(rules) => self.current = rules.into_iter(),
				Err(err) => {
					self.skipped += 1;
					warn!(
						"skipping stylesheet {}: {}",
						sheet.href.as_deref().unwrap_or("<inline>"),
						err
					);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::HostError;

	fn media(condition: &str) -> RuleEntry {
		RuleEntry::Media {
			condition: condition.into(),
		}
	}

	#[test]
	fn unreadable_sheets_are_skipped_between_readable_ones() {
		let sheets = vec![
			SheetSource {
				href: None,
				rules: Ok(vec![media("a")]),
			},
			SheetSource {
				href: Some("https://cdn.example/site.css".into()),
				rules: Err(HostError::UnreadableSheet("SecurityError".into())),
			},
			SheetSource {
				href: None,
				rules: Ok(vec![]),
			},
			SheetSource {
				href: None,
				rules: Ok(vec![media("b"), media("c")]),
			},
		];
		let mut scanner = RuleScanner::new(sheets);
		let rules: Vec<_> = scanner.by_ref().collect();
		assert_eq!(rules, vec![media("a"), media("b"), media("c")]);
		assert_eq!(scanner.skipped(), 1);
	}
}
