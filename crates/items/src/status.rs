//! Item lifecycle status.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use gearbase_core::{DomainError, DomainResult};

/// Closed set of lifecycle states for a tracked item.
///
/// Transition legality is enforced at the use-case boundary, not here:
/// different operations accept different subsets of states, so there is no
/// single global transition table. This type only answers questions about a
/// single state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Reserved,
    InUse,
    Maintenance,
    Subdivided,
    Donated,
    Discarded,
    Lost,
    Disassembled,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 9] = [
        ItemStatus::Available,
        ItemStatus::Reserved,
        ItemStatus::InUse,
        ItemStatus::Maintenance,
        ItemStatus::Subdivided,
        ItemStatus::Donated,
        ItemStatus::Discarded,
        ItemStatus::Lost,
        ItemStatus::Disassembled,
    ];

    pub fn is_available(self) -> bool {
        self == ItemStatus::Available
    }

    pub fn can_be_reserved(self) -> bool {
        self == ItemStatus::Available
    }

    pub fn can_be_used(self) -> bool {
        matches!(self, ItemStatus::Available | ItemStatus::Reserved)
    }

    pub fn can_be_returned(self) -> bool {
        matches!(self, ItemStatus::Reserved | ItemStatus::InUse)
    }

    /// No lifecycle use case can transition an item out of a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ItemStatus::Donated | ItemStatus::Discarded | ItemStatus::Lost | ItemStatus::Disassembled
        )
    }

    pub fn can_be_modified(self) -> bool {
        !self.is_terminal()
    }

    /// Wire/storage form (`snake_case`).
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Reserved => "reserved",
            ItemStatus::InUse => "in_use",
            ItemStatus::Maintenance => "maintenance",
            ItemStatus::Subdivided => "subdivided",
            ItemStatus::Donated => "donated",
            ItemStatus::Discarded => "discarded",
            ItemStatus::Lost => "lost",
            ItemStatus::Disassembled => "disassembled",
        }
    }

    /// Human-facing label. Must stay byte-for-byte stable for presentation
    /// compatibility.
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Available => "Disponible",
            ItemStatus::Reserved => "Reservado",
            ItemStatus::InUse => "En uso",
            ItemStatus::Maintenance => "En mantenimiento",
            ItemStatus::Subdivided => "Subdividido",
            ItemStatus::Donated => "Donado",
            ItemStatus::Discarded => "Descartado",
            ItemStatus::Lost => "Perdido",
            ItemStatus::Disassembled => "Desmontado",
        }
    }

    /// Badge variant the UI renders the label with.
    pub fn variant(self) -> &'static str {
        match self {
            ItemStatus::Available => "success",
            ItemStatus::Reserved => "warning",
            ItemStatus::InUse => "info",
            ItemStatus::Maintenance => "warning",
            ItemStatus::Subdivided => "secondary",
            ItemStatus::Donated => "secondary",
            ItemStatus::Discarded => "destructive",
            ItemStatus::Lost => "destructive",
            ItemStatus::Disassembled => "secondary",
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown item status '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_items_can_be_reserved() {
        for status in ItemStatus::ALL {
            assert_eq!(status.can_be_reserved(), status == ItemStatus::Available);
        }
    }

    #[test]
    fn usable_states_are_available_and_reserved() {
        assert!(ItemStatus::Available.can_be_used());
        assert!(ItemStatus::Reserved.can_be_used());
        assert!(!ItemStatus::InUse.can_be_used());
        assert!(!ItemStatus::Lost.can_be_used());
    }

    #[test]
    fn returnable_states_are_reserved_and_in_use() {
        assert!(ItemStatus::Reserved.can_be_returned());
        assert!(ItemStatus::InUse.can_be_returned());
        assert!(!ItemStatus::Available.can_be_returned());
    }

    #[test]
    fn terminal_states_cannot_be_modified() {
        let terminal = [
            ItemStatus::Donated,
            ItemStatus::Discarded,
            ItemStatus::Lost,
            ItemStatus::Disassembled,
        ];
        for status in ItemStatus::ALL {
            assert_eq!(status.is_terminal(), terminal.contains(&status));
            assert_eq!(status.can_be_modified(), !terminal.contains(&status));
        }
    }

    #[test]
    fn subdivided_is_not_terminal_but_not_available() {
        // Subdivided items remain visible in history and keep accepting
        // bookkeeping updates, they just cannot be reserved or used.
        assert!(!ItemStatus::Subdivided.is_terminal());
        assert!(!ItemStatus::Subdivided.is_available());
        assert!(!ItemStatus::Subdivided.can_be_used());
    }

    #[test]
    fn labels_and_variants_are_stable() {
        let expected = [
            (ItemStatus::Available, "Disponible", "success"),
            (ItemStatus::Reserved, "Reservado", "warning"),
            (ItemStatus::InUse, "En uso", "info"),
            (ItemStatus::Maintenance, "En mantenimiento", "warning"),
            (ItemStatus::Subdivided, "Subdividido", "secondary"),
            (ItemStatus::Donated, "Donado", "secondary"),
            (ItemStatus::Discarded, "Descartado", "destructive"),
            (ItemStatus::Lost, "Perdido", "destructive"),
            (ItemStatus::Disassembled, "Desmontado", "secondary"),
        ];
        for (status, label, variant) in expected {
            assert_eq!(status.label(), label);
            assert_eq!(status.variant(), variant);
        }
    }

    #[test]
    fn round_trips_through_wire_form() {
        for status in ItemStatus::ALL {
            let parsed: ItemStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "broken".parse::<ItemStatus>().unwrap_err();
        match err {
            DomainError::Validation { violations } => {
                assert!(violations[0].contains("broken"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
