//! Shared symbolic workspace.
//!
//! The workspace owns every named quantity of a run: real variables (couplings,
//! the Higgs mass) and derived functions built from them. All models share one
//! workspace, so all names live in one flat namespace.
//!
//! Two rules keep the graph well-formed:
//! - names are unique; re-declaring a name is an error, while
//!   [`Workspace::get_or_create`] turns repeated requests into reuse
//! - a function may only reference names that already exist, so declaration
//!   order is a topological order and the graph cannot contain cycles

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};

pub mod expr;

pub use expr::*;

/// A real-valued parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealVar {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Constant parameters are not floated in a fit.
    pub constant: bool,
}

impl RealVar {
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            min: value,
            max: value,
            constant: true,
        }
    }

    pub fn ranged(value: f64, min: f64, max: f64) -> Self {
        Self {
            value,
            min,
            max,
            constant: false,
        }
    }

    /// Change the allowed range, pulling the current value inside it.
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
    }
}

/// A named derived quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub title: String,
    pub expr: Expr,
}

impl Function {
    pub fn new(title: impl Into<String>, expr: Expr) -> Self {
        Self {
            title: title.into(),
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Var(RealVar),
    Func(Function),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    name: String,
    node: Node,
}

/// Named variables, functions and sets, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    name: String,
    entries: Vec<Entry>,
    sets: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            sets: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.entries[i].node)
    }

    /// Look up a variable; `None` if absent or not a variable.
    pub fn var(&self, name: &str) -> Option<&RealVar> {
        match self.node(name)? {
            Node::Var(v) => Some(v),
            Node::Func(_) => None,
        }
    }

    pub fn var_mut(&mut self, name: &str) -> Option<&mut RealVar> {
        let i = *self.index.get(name)?;
        match &mut self.entries[i].node {
            Node::Var(v) => Some(v),
            Node::Func(_) => None,
        }
    }

    /// Look up a function; `None` if absent or not a function.
    pub fn function(&self, name: &str) -> Option<&Function> {
        match self.node(name)? {
            Node::Func(f) => Some(f),
            Node::Var(_) => None,
        }
    }

    /// Iterate over `(name, node)` in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.node))
    }

    pub fn declare_var(&mut self, name: &str, var: RealVar) -> Result<()> {
        self.insert(name, Node::Var(var))
    }

    /// Declare a variable, or update an existing one in place.
    ///
    /// With a range the variable floats over it; without one it is fixed to
    /// `value`. An existing floating variable keeps its current value.
    pub fn do_var(&mut self, name: &str, value: f64, range: Option<(f64, f64)>) -> Result<()> {
        if !self.contains(name) {
            let var = match range {
                Some((min, max)) => RealVar::ranged(value, min, max),
                None => RealVar::constant(value),
            };
            return self.declare_var(name, var);
        }

        let var = self
            .var_mut(name)
            .ok_or_else(|| ModelError::NotAVariable(name.to_string()))?;
        match range {
            Some((min, max)) => {
                var.set_range(min, max);
                var.constant = false;
            }
            None => {
                var.min = var.min.min(value);
                var.max = var.max.max(value);
                var.value = value;
                var.constant = true;
            }
        }
        debug!(name, ?var, "updated variable");
        Ok(())
    }

    /// Set the value of an existing variable.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<()> {
        if !self.contains(name) {
            return Err(ModelError::UnknownName(name.to_string()));
        }
        let var = self
            .var_mut(name)
            .ok_or_else(|| ModelError::NotAVariable(name.to_string()))?;
        var.value = value;
        Ok(())
    }

    /// Declare a function. Every name it references must already exist.
    pub fn declare_function(&mut self, name: &str, function: Function) -> Result<()> {
        function.expr.validate()?;
        if let Some(missing) = function.expr.references().into_iter().find(|r| !self.contains(r)) {
            return Err(ModelError::UnknownName(format!("{missing} (referenced by {name})")));
        }
        self.insert(name, Node::Func(function))
    }

    /// Return whether `name` was created by this call.
    ///
    /// If `name` already exists nothing is built; otherwise `build` produces the
    /// function, which is then declared.
    pub fn get_or_create<F>(&mut self, name: &str, build: F) -> Result<bool>
    where
        F: FnOnce(&Workspace) -> Result<Function>,
    {
        if self.contains(name) {
            return Ok(false);
        }
        let function = build(self)?;
        debug!(name, expr = %function.expr, "created function");
        self.declare_function(name, function)?;
        Ok(true)
    }

    /// Define (or redefine) a named ordered set of existing names.
    pub fn define_set<S: AsRef<str>>(&mut self, name: &str, members: &[S]) -> Result<()> {
        let members: Vec<String> = members.iter().map(|m| m.as_ref().to_string()).collect();
        if let Some(missing) = members.iter().find(|m| !self.contains(m)) {
            return Err(ModelError::UnknownName(format!("{missing} (member of set {name})")));
        }
        self.sets.insert(name.to_string(), members);
        Ok(())
    }

    pub fn set(&self, name: &str) -> Option<&[String]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    pub fn sets(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Evaluate a variable or function at the current variable values.
    pub fn eval(&self, name: &str) -> Result<f64> {
        match self.node(name) {
            Some(Node::Var(v)) => Ok(v.value),
            Some(Node::Func(f)) => f.expr.eval(self),
            None => Err(ModelError::UnknownName(name.to_string())),
        }
    }

    /// Rebuild the name index and re-check the graph rules after deserializing.
    pub(crate) fn reindex(&mut self) -> Result<()> {
        let entries = std::mem::take(&mut self.entries);
        let sets = std::mem::take(&mut self.sets);
        self.index.clear();
        for entry in entries {
            match entry.node {
                Node::Var(v) => self.declare_var(&entry.name, v)?,
                Node::Func(f) => self.declare_function(&entry.name, f)?,
            }
        }
        for (name, members) in &sets {
            self.define_set(name, members.as_slice())?;
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, node: Node) -> Result<()> {
        if self.contains(name) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            name: name.to_string(),
            node,
        });
        Ok(())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new("w")
    }
}
