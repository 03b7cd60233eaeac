use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn value(&self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

/// Signs of (nuclear, field) displacement in a four-point stencil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignCombination {
    PlusPlus,
    PlusMinus,
    MinusPlus,
    MinusMinus,
}

impl SignCombination {
    pub const ALL: [SignCombination; 4] = [
        SignCombination::PlusPlus,
        SignCombination::PlusMinus,
        SignCombination::MinusPlus,
        SignCombination::MinusMinus,
    ];

    pub fn nuclear(&self) -> Sign {
        match self {
            SignCombination::PlusPlus | SignCombination::PlusMinus => Sign::Plus,
            SignCombination::MinusPlus | SignCombination::MinusMinus => Sign::Minus,
        }
    }

    pub fn field(&self) -> Sign {
        match self {
            SignCombination::PlusPlus | SignCombination::MinusPlus => Sign::Plus,
            SignCombination::PlusMinus | SignCombination::MinusMinus => Sign::Minus,
        }
    }

    /// Stencil weight of the mixed second derivative: +1, -1, -1, +1.
    pub fn weight(&self) -> f64 {
        self.nuclear().value() * self.field().value()
    }
}

/// One value per sign combination.
#[derive(Debug, Clone, PartialEq)]
pub struct FourPoint<T> {
    pub pp: T,
    pub pm: T,
    pub mp: T,
    pub mm: T,
}

impl<T> FourPoint<T> {
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(SignCombination) -> T,
    {
        FourPoint {
            pp: f(SignCombination::PlusPlus),
            pm: f(SignCombination::PlusMinus),
            mp: f(SignCombination::MinusPlus),
            mm: f(SignCombination::MinusMinus),
        }
    }

    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where
        F: FnMut(SignCombination) -> Result<T, E>,
    {
        Ok(FourPoint {
            pp: f(SignCombination::PlusPlus)?,
            pm: f(SignCombination::PlusMinus)?,
            mp: f(SignCombination::MinusPlus)?,
            mm: f(SignCombination::MinusMinus)?,
        })
    }

    pub fn get(&self, combination: SignCombination) -> &T {
        match combination {
            SignCombination::PlusPlus => &self.pp,
            SignCombination::PlusMinus => &self.pm,
            SignCombination::MinusPlus => &self.mp,
            SignCombination::MinusMinus => &self.mm,
        }
    }
}

impl FourPoint<Complex64> {
    /// Im[(f(++) - f(+-) - f(-+) + f(--)) / (4 ΔR ΔB)]
    pub fn central_difference(&self, nuclear_step: f64, field_step: f64) -> f64 {
        let stencil: Complex64 = SignCombination::ALL
            .iter()
            .map(|&sc| *self.get(sc) * sc.weight())
            .sum();
        (stencil / (4.0 * nuclear_step * field_step)).im
    }
}

/// (nuclear coordinate, field direction) position in the tensor; the
/// nuclear coordinate is `3 · atom + cartesian`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIndex {
    pub coordinate: usize,
    pub field: usize,
}

impl ElementIndex {
    pub fn new(coordinate: usize, field: usize) -> Self {
        ElementIndex { coordinate, field }
    }

    pub fn atom(&self) -> usize {
        self.coordinate / 3
    }
}
