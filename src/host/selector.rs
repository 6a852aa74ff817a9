//! Selector matching for replayed snapshots, on top of Servo's `selectors`.
//!
//! Snapshot elements form a tree through their `parent` index, so
//! combinators and the tree-structural pseudo-classes resolve as they would in
//! the browser. User-action states (`:hover`, `:focus`, ...) parse but never
//! match a captured page. Pseudo-elements and unknown pseudo-classes are
//! rejected, which makes the rule unresolvable.

use cssparser::{
	CowRcStr, CssStringWriter, ParseError, Parser as CssParser, ParserInput, SourceLocation, ToCss,
	serialize_identifier,
};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
	ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
	NeedsSelectorFlags, matches_selector_list,
};
use selectors::parser::{
	ParseRelative, Parser as SelParser, SelectorImpl, SelectorList as ServoList,
	SelectorParseErrorKind,
};
use selectors::{Element, NthIndexCache, OpaqueElement, context::QuirksMode};

use super::HostError;
use super::snapshot::SnapshotElement;

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssIdent(String);

impl AsRef<str> for CssIdent {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::borrow::Borrow<str> for CssIdent {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl<'a> From<&'a str> for CssIdent {
	fn from(s: &'a str) -> Self {
		Self(s.to_owned())
	}
}

impl ToCss for CssIdent {
	fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
	where
		W: std::fmt::Write,
	{
		serialize_identifier(&self.0, dest)
	}
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CssAttrValue(String);

impl AsRef<str> for CssAttrValue {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl<'a> From<&'a str> for CssAttrValue {
	fn from(s: &'a str) -> Self {
		Self(s.to_owned())
	}
}

impl ToCss for CssAttrValue {
	fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
	where
		W: std::fmt::Write,
	{
		use std::fmt::Write;
		write!(CssStringWriter::new(dest), "{}", &self.0)
	}
}

#[derive(Clone, Debug)]
pub enum SnapshotImpl {}

impl SelectorImpl for SnapshotImpl {
	type ExtraMatchingData<'a> = ();
	type AttrValue = CssAttrValue;
	type Identifier = CssIdent;
	type LocalName = CssIdent;
	type NamespaceUrl = CssIdent;
	type NamespacePrefix = CssIdent;
	type BorrowedNamespaceUrl = str;
	type BorrowedLocalName = str;
	type NonTSPseudoClass = StatePseudo;
	type PseudoElement = Never;
}

/// Element states a capture cannot observe, plus the attribute-backed ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatePseudo {
	Hover,
	Active,
	Focus,
	FocusWithin,
	FocusVisible,
	Visited,
	Link,
	AnyLink,
	Checked,
	Disabled,
}

impl StatePseudo {
	fn from_name(name: &str) -> Option<Self> {
		STATES
			.iter()
			.copied()
			.find(|state| state.name().eq_ignore_ascii_case(name))
	}

	fn name(self) -> &'static str {
		match self {
			StatePseudo::Hover => "hover",
			StatePseudo::Active => "active",
			StatePseudo::Focus => "focus",
			StatePseudo::FocusWithin => "focus-within",
			StatePseudo::FocusVisible => "focus-visible",
			StatePseudo::Visited => "visited",
			StatePseudo::Link => "link",
			StatePseudo::AnyLink => "any-link",
			StatePseudo::Checked => "checked",
			StatePseudo::Disabled => "disabled",
		}
	}
}

const STATES: &[StatePseudo] = &[
	StatePseudo::Hover,
	StatePseudo::Active,
	StatePseudo::Focus,
	StatePseudo::FocusWithin,
	StatePseudo::FocusVisible,
	StatePseudo::Visited,
	StatePseudo::Link,
	StatePseudo::AnyLink,
	StatePseudo::Checked,
	StatePseudo::Disabled,
];

impl ToCss for StatePseudo {
	fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
	where
		W: std::fmt::Write,
	{
		dest.write_char(':')?;
		dest.write_str(self.name())
	}
}

impl selectors::parser::NonTSPseudoClass for StatePseudo {
	type Impl = SnapshotImpl;

	fn is_active_or_hover(&self) -> bool {
		matches!(self, StatePseudo::Active | StatePseudo::Hover)
	}

	fn is_user_action_state(&self) -> bool {
		matches!(
			self,
			StatePseudo::Active
				| StatePseudo::Hover
				| StatePseudo::Focus
				| StatePseudo::FocusWithin
				| StatePseudo::FocusVisible
		)
	}
}

/// Pseudo-elements never parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Never {}

impl ToCss for Never {
	fn to_css<W>(&self, _dest: &mut W) -> std::fmt::Result
	where
		W: std::fmt::Write,
	{
		Ok(())
	}
}

impl selectors::parser::PseudoElement for Never {
	type Impl = SnapshotImpl;

	fn accepts_state_pseudo_classes(&self) -> bool {
		false
	}

	fn valid_after_slotted(&self) -> bool {
		false
	}
}

struct SnapshotParser;

impl<'i> SelParser<'i> for SnapshotParser {
	type Impl = SnapshotImpl;
	type Error = SelectorParseErrorKind<'i>;

	fn parse_non_ts_pseudo_class(
		&self,
		location: SourceLocation,
		name: CowRcStr<'i>,
	) -> Result<StatePseudo, ParseError<'i, Self::Error>> {
		match StatePseudo::from_name(&name) {
			Some(state) => Ok(state),
			None => Err(location
				.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name))),
		}
	}
}

/// A snapshot element seen through its position in the element list.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotNode<'a> {
	elements: &'a [SnapshotElement],
	index: usize,
}

impl<'a> SnapshotNode<'a> {
	pub fn new(elements: &'a [SnapshotElement], index: usize) -> Self {
		Self { elements, index }
	}

	fn element(&self) -> &'a SnapshotElement {
		&self.elements[self.index]
	}

	// Parents must precede their children; anything else is treated as a root.
	fn parent_index(&self) -> Option<usize> {
		self.element().parent.filter(|p| *p < self.index)
	}

	fn at(&self, index: usize) -> Self {
		Self::new(self.elements, index)
	}

	fn is_sibling(&self, index: usize) -> bool {
		self.at(index).parent_index() == self.parent_index()
	}

	fn attr(&self, name: &str) -> Option<String> {
		let element = self.element();
		match name {
			"id" => element.id.clone(),
			"class" if !element.classes.is_empty() => Some(element.classes.join(" ")),
			_ => element.attributes.get(name).cloned(),
		}
	}
}

fn case_eq(case: CaseSensitivity, a: &str, b: &str) -> bool {
	match case {
		CaseSensitivity::CaseSensitive => a == b,
		CaseSensitivity::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
	}
}

impl Element for SnapshotNode<'_> {
	type Impl = SnapshotImpl;

	fn opaque(&self) -> OpaqueElement {
		OpaqueElement::new(self.element())
	}

	fn parent_element(&self) -> Option<Self> {
		self.parent_index().map(|p| self.at(p))
	}

	fn parent_node_is_shadow_root(&self) -> bool {
		false
	}

	fn containing_shadow_host(&self) -> Option<Self> {
		None
	}

	fn prev_sibling_element(&self) -> Option<Self> {
		(0..self.index)
			.rev()
			.find(|i| self.is_sibling(*i))
			.map(|i| self.at(i))
	}

	fn next_sibling_element(&self) -> Option<Self> {
		(self.index + 1..self.elements.len())
			.find(|i| self.is_sibling(*i))
			.map(|i| self.at(i))
	}

	fn first_element_child(&self) -> Option<Self> {
		(self.index + 1..self.elements.len())
			.find(|i| self.at(*i).parent_index() == Some(self.index))
			.map(|i| self.at(i))
	}

	fn is_pseudo_element(&self) -> bool {
		false
	}

	fn is_html_element_in_html_document(&self) -> bool {
		true
	}

	fn has_local_name(&self, name: &str) -> bool {
		self.element().tag.eq_ignore_ascii_case(name)
	}

	fn has_namespace(&self, _ns: &str) -> bool {
		true
	}

	fn is_same_type(&self, other: &Self) -> bool {
		self.element().tag.eq_ignore_ascii_case(&other.element().tag)
	}

	fn attr_matches(
		&self,
		_ns: &NamespaceConstraint<&CssIdent>,
		local_name: &CssIdent,
		operation: &AttrSelectorOperation<&CssAttrValue>,
	) -> bool {
		self.attr(local_name.as_ref())
			.is_some_and(|value| operation.eval_str(&value))
	}

	fn match_non_ts_pseudo_class(
		&self,
		pc: &StatePseudo,
		_context: &mut MatchingContext<Self::Impl>,
	) -> bool {
		match pc {
			StatePseudo::Link | StatePseudo::AnyLink => self.is_link(),
			StatePseudo::Checked => self.element().attributes.contains_key("checked"),
			StatePseudo::Disabled => self.element().attributes.contains_key("disabled"),
			_ => false,
		}
	}

	fn match_pseudo_element(&self, pe: &Never, _context: &mut MatchingContext<Self::Impl>) -> bool {
		match *pe {}
	}

	fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

	fn is_link(&self) -> bool {
		let element = self.element();
		element.tag.eq_ignore_ascii_case("a") && element.attributes.contains_key("href")
	}

	fn is_html_slot_element(&self) -> bool {
		false
	}

	fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
		None
	}

	fn is_part(&self, _name: &CssIdent) -> bool {
		false
	}

	fn has_id(&self, id: &CssIdent, case: CaseSensitivity) -> bool {
		self.element()
			.id
			.as_deref()
			.is_some_and(|v| case_eq(case, v, id.as_ref()))
	}

	fn has_class(&self, name: &CssIdent, case: CaseSensitivity) -> bool {
		self.element()
			.classes
			.iter()
			.any(|c| case_eq(case, c, name.as_ref()))
	}

	fn is_empty(&self) -> bool {
		self.first_element_child().is_none()
	}

	fn is_root(&self) -> bool {
		self.parent_index().is_none()
	}
}

/// A parsed, comma-separated selector list.
#[derive(Clone, Debug)]
pub struct SelectorList(ServoList<SnapshotImpl>);

impl SelectorList {
	/// Parse `source`; anything `selectors` rejects is reported as
	/// [`HostError::InvalidSelector`].
	pub fn parse(source: &str) -> Result<Self, HostError> {
		let mut input = ParserInput::new(source);
		let mut parser = CssParser::new(&mut input);
		ServoList::parse(&SnapshotParser, &mut parser, ParseRelative::No)
			.map(SelectorList)
			.map_err(|err| HostError::InvalidSelector {
				selector: source.to_string(),
				reason: format!("{:?}", err.kind),
			})
	}

	/// Whether `elements[index]` matches any selector in the list.
	pub fn matches(&self, elements: &[SnapshotElement], index: usize) -> bool {
		if index >= elements.len() {
			return false;
		}
		let mut cache = NthIndexCache::default();
		let mut context = MatchingContext::new(
			MatchingMode::Normal,
			None,
			&mut cache,
			QuirksMode::NoQuirks,
			NeedsSelectorFlags::No,
			IgnoreNthChildForInvalidation::No,
		);
		matches_selector_list(&self.0, &SnapshotNode::new(elements, index), &mut context)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;
	use crate::host::Rect;

	fn element(tag: &str, parent: Option<usize>, id: Option<&str>, classes: &[&str]) -> SnapshotElement {
		SnapshotElement {
			tag: tag.into(),
			parent,
			id: id.map(Into::into),
			classes: classes.iter().map(|c| c.to_string()).collect(),
			attributes: BTreeMap::new(),
			rect: Rect::default(),
		}
	}

	// body > (section#hero > p.lead.big, p.lead, a[href]), div > p
	fn page() -> Vec<SnapshotElement> {
		let mut link = element("a", Some(1), None, &[]);
		link.attributes.insert("href".into(), "/docs".into());
		vec![
			element("body", None, None, &[]),
			element("section", Some(0), Some("hero"), &[]),
			element("p", Some(1), None, &["lead", "big"]),
			element("p", Some(1), None, &["lead"]),
			link,
			element("div", Some(0), None, &[]),
			element("p", Some(5), None, &[]),
		]
	}

	fn matching(source: &str) -> Vec<usize> {
		let elements = page();
		let list = SelectorList::parse(source).unwrap();
		(0..elements.len())
			.filter(|i| list.matches(&elements, *i))
			.collect()
	}

	#[test]
	fn compound_selectors_match_all_parts() {
		assert_eq!(matching("p.lead.big, #hero"), vec![1, 2]);
		assert_eq!(matching("*").len(), 7);
		assert_eq!(matching("P.lead"), vec![2, 3]);
	}

	#[test]
	fn combinators_follow_parent_links() {
		assert_eq!(matching("section p"), vec![2, 3]);
		assert_eq!(matching("body > p"), vec![] as Vec<usize>);
		assert_eq!(matching("div > p"), vec![6]);
		assert_eq!(matching("p.big + p"), vec![3]);
		assert_eq!(matching("p.big ~ a"), vec![4]);
	}

	#[test]
	fn structural_and_attribute_selectors() {
		assert_eq!(matching("p:first-child"), vec![2, 6]);
		assert_eq!(matching("section > :last-child"), vec![4]);
		assert_eq!(matching("p:nth-of-type(2)"), vec![3]);
		assert_eq!(matching("a[href^=\"/doc\"]"), vec![4]);
		assert_eq!(matching("[class~=big]"), vec![2]);
		assert_eq!(matching(":root"), vec![0]);
		assert_eq!(matching("a:link"), vec![4]);
	}

	#[test]
	fn user_action_states_never_match_a_capture() {
		assert_eq!(matching("a:hover, p:focus"), vec![] as Vec<usize>);
	}

	#[test]
	fn unsupported_syntax_is_rejected() {
		for source in ["", "p::before", "p:made-up", "div >", ".a..b"] {
			assert!(
				matches!(
					SelectorList::parse(source),
					Err(HostError::InvalidSelector { .. })
				),
				"{source} should be rejected"
			);
		}
	}
}
