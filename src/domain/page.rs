//! In-memory model of the dashboard page: the controls the handlers read from and the
//! display targets they write to.

use crate::utils::error::{DashError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Oldest diagnostics are dropped once the console holds this many.
pub const CONSOLE_CAPACITY: usize = 200;

pub mod ids {
    pub const LAYER_CHECKLIST: &str = "layer-checklist";
    pub const DISTRICT_DROPDOWN: &str = "district-dropdown";
    pub const DATASET_DROPDOWN: &str = "dataset-dropdown";
    pub const DISTRICT_DROPDOWN_INFO: &str = "district-dropdown-info";
    pub const RISK_PLOT: &str = "risk-plot";
    pub const CHIRPS: &str = "chirps";
    pub const TEMP: &str = "temp";
    pub const SOIL_MOIST: &str = "soil_moist";
    pub const NDVI: &str = "ndvi";

    pub const TEXT_SLOTS: [&str; 4] = [CHIRPS, TEMP, SOIL_MOIST, NDVI];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklist {
    boxes: Vec<Checkbox>,
}

impl Checklist {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            boxes: items
                .into_iter()
                .map(|(value, checked)| Checkbox {
                    value: value.into(),
                    checked,
                })
                .collect(),
        }
    }

    pub fn set_checked(&mut self, value: &str, checked: bool) -> Result<()> {
        let checkbox = self
            .boxes
            .iter_mut()
            .find(|b| b.value == value)
            .ok_or_else(|| DashError::UnknownOptionError {
                id: ids::LAYER_CHECKLIST.to_string(),
                value: value.to_string(),
            })?;
        checkbox.checked = checked;
        Ok(())
    }

    pub fn checked_values(&self) -> impl Iterator<Item = &str> {
        self.boxes
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.value.as_str())
    }

    pub fn boxes(&self) -> &[Checkbox] {
        &self.boxes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    id: &'static str,
    options: Vec<String>,
    selected: String,
}

impl Dropdown {
    /// Starts on `selected`, or on the first option when `selected` is `None`.
    pub fn new(id: &'static str, options: Vec<String>, selected: Option<String>) -> Result<Self> {
        let selected = match selected {
            Some(value) => value,
            None => options
                .first()
                .cloned()
                .ok_or_else(|| DashError::ConfigValidationError {
                    field: id.to_string(),
                    message: "dropdown needs at least one option".to_string(),
                })?,
        };

        let mut dropdown = Self {
            id,
            options,
            selected: String::new(),
        };
        dropdown.select(&selected)?;
        Ok(dropdown)
    }

    pub fn select(&mut self, value: &str) -> Result<()> {
        if !self.options.iter().any(|o| o == value) {
            return Err(DashError::UnknownOptionError {
                id: self.id.to_string(),
                value: value.to_string(),
            });
        }
        self.selected = value.to_string();
        Ok(())
    }

    /// Selects `value`, appending it as a new option first if the list lacks it.
    /// Returns whether the option was added.
    pub fn select_or_insert(&mut self, value: &str) -> bool {
        let added = !self.options.iter().any(|o| o == value);
        if added {
            tracing::debug!("Adding option '{}' to {}", value, self.id);
            self.options.push(value.to_string());
        }
        self.selected = value.to_string();
        added
    }

    pub fn value(&self) -> &str {
        &self.selected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: Option<String>,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub source: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub layer_checklist: Checklist,
    pub district: Dropdown,
    pub dataset: Dropdown,
    pub district_info: Dropdown,
    pub plot: ImageElement,
    text: BTreeMap<&'static str, String>,
    console: Vec<Diagnostic>,
}

impl Page {
    pub fn new(
        layer_checklist: Checklist,
        district: Dropdown,
        dataset: Dropdown,
        district_info: Dropdown,
    ) -> Self {
        Self {
            layer_checklist,
            district,
            dataset,
            district_info,
            plot: ImageElement::default(),
            text: ids::TEXT_SLOTS.into_iter().map(|id| (id, String::new())).collect(),
            console: Vec::new(),
        }
    }

    pub fn dropdown_mut(&mut self, id: &str) -> Result<&mut Dropdown> {
        match id {
            ids::DISTRICT_DROPDOWN => Ok(&mut self.district),
            ids::DATASET_DROPDOWN => Ok(&mut self.dataset),
            ids::DISTRICT_DROPDOWN_INFO => Ok(&mut self.district_info),
            other => Err(DashError::UnknownElementError {
                id: other.to_string(),
            }),
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    pub fn set_text(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
        let slot = self
            .text
            .get_mut(id)
            .ok_or_else(|| DashError::UnknownElementError { id: id.to_string() })?;
        *slot = value.into();
        Ok(())
    }

    /// Writes several text slots at once. Every id is checked before the first write, so
    /// an unknown id leaves all slots as they were.
    pub fn set_texts<'a, I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let values: Vec<(&str, String)> = values.into_iter().collect();
        if let Some((id, _)) = values.iter().find(|(id, _)| !self.text.contains_key(*id)) {
            return Err(DashError::UnknownElementError { id: id.to_string() });
        }
        for (id, value) in values {
            if let Some(slot) = self.text.get_mut(id) {
                *slot = value;
            }
        }
        Ok(())
    }

    /// Browser-console analogue: diagnostics are recorded here and nowhere visible.
    /// Keeps the newest [`CONSOLE_CAPACITY`] entries.
    pub fn log_diagnostic(&mut self, source: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(source, "{}", message);
        if self.console.len() >= CONSOLE_CAPACITY {
            let excess = self.console.len() + 1 - CONSOLE_CAPACITY;
            self.console.drain(..excess);
        }
        self.console.push(Diagnostic {
            at: Utc::now(),
            source,
            message,
        });
    }

    pub fn console(&self) -> &[Diagnostic] {
        &self.console
    }
}
