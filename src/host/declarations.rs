//! Declaration-block parsing for replayed `style` text.

use cssparser::{
	AtRuleParser, CowRcStr, DeclarationParser, Delimiter, ParseError, Parser, ParserInput,
	QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, parse_important,
};

struct BlockParser;

impl<'i> DeclarationParser<'i> for BlockParser {
	type Declaration = (String, String);
	type Error = ();

	fn parse_value<'t>(
		&mut self,
		name: CowRcStr<'i>,
		input: &mut Parser<'i, 't>,
	) -> Result<Self::Declaration, ParseError<'i, ()>> {
		let start = input.position();
		input.parse_until_before(Delimiter::Bang, |value| {
			while value.next().is_ok() {}
			Ok::<_, ParseError<'i, ()>>(())
		})?;
		let value = input.slice_from(start).trim().to_string();
		// The priority flag is not part of the value, as in `getPropertyValue`.
		let _ = input.try_parse(parse_important);
		input.expect_exhausted()?;
		Ok((name.to_ascii_lowercase(), value))
	}
}

impl<'i> AtRuleParser<'i> for BlockParser {
	type Prelude = ();
	type AtRule = (String, String);
	type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for BlockParser {
	type Prelude = ();
	type QualifiedRule = (String, String);
	type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for BlockParser {
	fn parse_declarations(&self) -> bool {
		true
	}

	fn parse_qualified(&self) -> bool {
		false
	}
}

/// Split a `name: value; ...` block into lowercase names and trimmed values.
///
/// Malformed declarations are dropped and parsing resumes at the next `;`.
pub fn parse_block(block: &str) -> Vec<(String, String)> {
	let mut input = ParserInput::new(block);
	let mut parser = Parser::new(&mut input);
	let mut body = BlockParser;
	RuleBodyParser::new(&mut parser, &mut body)
		.filter_map(Result::ok)
		.collect()
}
