// src/solver/model.rs

/// Handle to a variable declared on a `MipModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl VarDef {
    /// Continuous, unbounded in both directions.
    pub fn free(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower: None,
            upper: None,
        }
    }

    /// Continuous with a lower bound of zero.
    pub fn non_negative(name: impl Into<String>) -> Self {
        Self::free(name).min(0.0)
    }

    pub fn integer(mut self) -> Self {
        self.kind = VarKind::Integer;
        self
    }

    pub fn min(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn max(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }
}

/// `Σ coef * var + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    /// Unit-coefficient sum of `vars`.
    pub fn sum(vars: &[VarId]) -> Self {
        Self {
            terms: vars.iter().map(|&v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Evaluates the expression against a full assignment, indexed by `VarId`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values[var.index()])
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

/// `expr <relation> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub label: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimise,
    Maximise,
}

/// Solver-neutral mixed-integer linear model.
///
/// Formulations declare variables, add constraints and set the objective here;
/// a `MipBackend` translates the finished model to a concrete engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MipModel {
    name: String,
    variables: Vec<VarDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
    sense: Sense,
}

impl MipModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            sense: Sense::Minimise,
        }
    }

    pub fn add_var(&mut self, def: VarDef) -> VarId {
        self.variables.push(def);
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(
        &mut self,
        label: impl Into<String>,
        expr: LinearExpr,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            label: label.into(),
            expr,
            relation,
            rhs,
        });
    }

    pub fn set_objective(&mut self, sense: Sense, objective: LinearExpr) {
        self.sense = sense;
        self.objective = objective;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Labels of every constraint violated by `values` (bounds included).
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<String> {
        let mut out = Vec::new();
        for (def, value) in self.variables.iter().zip(values) {
            if def.lower.is_some_and(|lo| *value < lo - tolerance)
                || def.upper.is_some_and(|hi| *value > hi + tolerance)
            {
                out.push(format!("bounds({})", def.name));
            }
        }
        out.extend(
            self.constraints
                .iter()
                .filter(|c| !c.is_satisfied(values, tolerance))
                .map(|c| c.label.clone()),
        );
        out
    }
}
