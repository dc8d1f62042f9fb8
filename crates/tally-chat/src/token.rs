// token.rs — The button-token grammar.
//
// Tokens are opaque strings the transport round-trips unmodified; routing
// in tally-flow depends on this grammar staying stable:
//
//   inc_<uuid>  dec_<uuid>  add_goal  edit_start  edit_select_<uuid>
//   action_edit  action_delete  field_name  field_threshold  field_type
//   newtype_more  newtype_less  edit_cancel
//
// Display encodes, `parse` decodes; unknown strings parse to None and the
// router treats them as a deliberate no-op.

use std::fmt;

use uuid::Uuid;

/// Which goal field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldToken {
    Name,
    Threshold,
    Kind,
}

impl FieldToken {
    fn suffix(&self) -> &'static str {
        match self {
            FieldToken::Name => "name",
            FieldToken::Threshold => "threshold",
            // On the wire the kind field keeps its historical name "type".
            FieldToken::Kind => "type",
        }
    }
}

/// Which goal kind a kind-choice button selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindToken {
    More,
    Less,
}

/// A parsed button token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonToken {
    /// `inc_<uuid>` — bump the goal's progress by one.
    Increment(Uuid),
    /// `dec_<uuid>` — drop the goal's progress by one (floored at zero).
    Decrement(Uuid),
    /// `add_goal` — start the add-goal dialog.
    AddGoal,
    /// `edit_start` — start the manage-goals dialog.
    EditStart,
    /// `edit_select_<uuid>` — pick the goal to manage.
    EditSelect(Uuid),
    /// `action_edit` — edit a field of the selected goal.
    ActionEdit,
    /// `action_delete` — delete the selected goal.
    ActionDelete,
    /// `field_<name|threshold|type>` — pick which field to edit.
    Field(FieldToken),
    /// `newtype_<more|less>` — kind choice, used by both dialogs.
    Kind(KindToken),
    /// `edit_cancel` — abandon the manage-goals dialog.
    EditCancel,
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonToken::Increment(id) => write!(f, "inc_{id}"),
            ButtonToken::Decrement(id) => write!(f, "dec_{id}"),
            ButtonToken::AddGoal => write!(f, "add_goal"),
            ButtonToken::EditStart => write!(f, "edit_start"),
            ButtonToken::EditSelect(id) => write!(f, "edit_select_{id}"),
            ButtonToken::ActionEdit => write!(f, "action_edit"),
            ButtonToken::ActionDelete => write!(f, "action_delete"),
            ButtonToken::Field(field) => write!(f, "field_{}", field.suffix()),
            ButtonToken::Kind(KindToken::More) => write!(f, "newtype_more"),
            ButtonToken::Kind(KindToken::Less) => write!(f, "newtype_less"),
            ButtonToken::EditCancel => write!(f, "edit_cancel"),
        }
    }
}

impl ButtonToken {
    /// Decode a raw callback string. `None` means "not ours" — the router
    /// ignores it rather than erroring (stale keyboards happen).
    pub fn parse(raw: &str) -> Option<ButtonToken> {
        match raw {
            "add_goal" => return Some(ButtonToken::AddGoal),
            "edit_start" => return Some(ButtonToken::EditStart),
            "action_edit" => return Some(ButtonToken::ActionEdit),
            "action_delete" => return Some(ButtonToken::ActionDelete),
            "field_name" => return Some(ButtonToken::Field(FieldToken::Name)),
            "field_threshold" => return Some(ButtonToken::Field(FieldToken::Threshold)),
            "field_type" => return Some(ButtonToken::Field(FieldToken::Kind)),
            "newtype_more" => return Some(ButtonToken::Kind(KindToken::More)),
            "newtype_less" => return Some(ButtonToken::Kind(KindToken::Less)),
            "edit_cancel" => return Some(ButtonToken::EditCancel),
            _ => {}
        }
        if let Some(id) = raw.strip_prefix("inc_") {
            return Uuid::parse_str(id).ok().map(ButtonToken::Increment);
        }
        if let Some(id) = raw.strip_prefix("dec_") {
            return Uuid::parse_str(id).ok().map(ButtonToken::Decrement);
        }
        if let Some(id) = raw.strip_prefix("edit_select_") {
            return Uuid::parse_str(id).ok().map(ButtonToken::EditSelect);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips() {
        let id = Uuid::new_v4();
        let tokens = [
            ButtonToken::Increment(id),
            ButtonToken::Decrement(id),
            ButtonToken::AddGoal,
            ButtonToken::EditStart,
            ButtonToken::EditSelect(id),
            ButtonToken::ActionEdit,
            ButtonToken::ActionDelete,
            ButtonToken::Field(FieldToken::Name),
            ButtonToken::Field(FieldToken::Threshold),
            ButtonToken::Field(FieldToken::Kind),
            ButtonToken::Kind(KindToken::More),
            ButtonToken::Kind(KindToken::Less),
            ButtonToken::EditCancel,
        ];
        for token in tokens {
            assert_eq!(ButtonToken::parse(&token.to_string()), Some(token));
        }
    }

    #[test]
    fn kind_field_token_uses_wire_name_type() {
        assert_eq!(ButtonToken::Field(FieldToken::Kind).to_string(), "field_type");
    }

    #[test]
    fn unknown_tokens_parse_to_none() {
        for raw in ["", "bogus", "inc_", "inc_not-a-uuid", "edit_select_", "field_color"] {
            assert_eq!(ButtonToken::parse(raw), None, "raw = {raw:?}");
        }
    }
}
