use oxide_translator::bot::handlers::{Command, InboundEvent};
use proptest::prelude::*;
use teloxide::types::ChatId;

fn flip_case(keyword: &str, flips: &[bool]) -> String {
    keyword
        .chars()
        .zip(flips.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    /// Every casing of a keyword is recognised as that command.
    #[test]
    fn keywords_match_in_any_case(
        idx in 0usize..4,
        flips in proptest::collection::vec(any::<bool>(), 1..16)
    ) {
        let command = Command::ALL[idx];
        let text = flip_case(command.keyword(), &flips);

        prop_assert_eq!(Command::from_text(&text), Some(command));
        prop_assert_eq!(
            InboundEvent::from_text(ChatId(1), &text),
            InboundEvent::Command { chat_id: ChatId(1), command }
        );
    }

    /// Anything that is not exactly a keyword is relayed verbatim as free text.
    #[test]
    fn other_text_is_free_text(text in "\\PC*") {
        prop_assume!(!Command::ALL
            .iter()
            .any(|c| c.keyword().eq_ignore_ascii_case(&text)));

        prop_assert_eq!(
            InboundEvent::from_text(ChatId(5), &text),
            InboundEvent::Text { chat_id: ChatId(5), text: text.clone() }
        );
    }

    /// Arguments or a bot mention turn a command into free text.
    #[test]
    fn keyword_with_suffix_is_free_text(idx in 0usize..4, suffix in "[ @_a-z0-9]{1,12}") {
        let text = format!("{}{}", Command::ALL[idx].keyword(), suffix);
        prop_assert_eq!(Command::from_text(&text), None);
    }
}
