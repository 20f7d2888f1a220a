use serde_json::{Map, Value};

use super::config::LabeledConfig;
use crate::{
    errors::{Error, Result},
    helpers,
};

/// A dimension over an ordered list of labels, which can be any JSON value.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledDimension {
    values: Vec<Value>,
    label: String,
    description: String,
    application: Map<String, Value>,
}

impl LabeledDimension {
    pub(crate) fn new(config: LabeledConfig) -> Result<Self> {
        let mut dimension = Self {
            values: vec![],
            label: config.label.unwrap_or_default(),
            description: config.description.unwrap_or_default(),
            application: config.application.unwrap_or_default(),
        };
        dimension.set_values(config.values)?;

        Ok(dimension)
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn application(&self) -> &Map<String, Value> {
        &self.application
    }

    pub(crate) fn set_values(&mut self, values: Vec<Value>) -> Result<()> {
        if values.is_empty() {
            return Err(Error::value("values", "at least one label is required"));
        }
        self.values = values;

        Ok(())
    }

    pub(crate) fn set_count(&mut self, count: usize) -> Result<()> {
        helpers::truncate(&mut self.values, count)
    }

    pub(crate) fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = label.into();
    }

    pub(crate) fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    pub(crate) fn set_application(&mut self, application: Map<String, Value>) {
        self.application = application;
    }

    pub(crate) fn to_dictionary(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), "labeled".into());
        map.insert("non_quantitative".into(), true.into());
        map.insert("values".into(), self.values.clone().into());
        if !self.label.trim().is_empty() {
            map.insert("label".into(), self.label.clone().into());
        }
        if !self.description.trim().is_empty() {
            map.insert("description".into(), self.description.clone().into());
        }
        if !self.application.is_empty() {
            map.insert("application".into(), self.application.clone().into());
        }

        map
    }
}
