use crate::dns::normalize_exchange;

/// One mail exchanger as published in DNS. The derived ordering compares
/// `preference` first, then `exchange`, which is the order senders try hosts.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    /// Lowercase hostname without the root dot once it went through
    /// [`MxStatus::from_answer`].
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }

    /// RFC 7505 "null MX": the domain explicitly accepts no mail.
    pub fn is_null(&self) -> bool {
        self.exchange.trim_end_matches('.').is_empty()
    }
}

/// Outcome of an MX query that reached a nameserver.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MxStatus {
    /// Never empty, sorted and free of duplicates.
    Records(Vec<MxRecord>),
    NoRecords,
}

impl MxStatus {
    /// Build from a raw answer: normalise hostnames, drop null MX entries,
    /// sort by preference and remove duplicates.
    pub fn from_answer(answer: Vec<MxRecord>) -> Self {
        let mut records: Vec<MxRecord> = answer
            .into_iter()
            .filter(|record| !record.is_null())
            .map(|record| MxRecord::new(record.preference, normalize_exchange(&record.exchange)))
            .collect();
        records.sort();
        records.dedup();
        if records.is_empty() {
            Self::NoRecords
        } else {
            Self::Records(records)
        }
    }

    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records,
            Self::NoRecords => &[],
        }
    }

    /// Hostnames, most preferred first.
    pub fn into_exchanges(self) -> Vec<String> {
        match self {
            Self::Records(records) => records.into_iter().map(|r| r.exchange).collect(),
            Self::NoRecords => Vec::new(),
        }
    }
}
