use ndarray::Array2;
use pricing::{BlackScholesMerton, ContractParameter, OptionContract, OptionPrice, OptionType};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::debug;

use crate::error::SweepError;
use crate::samples::SampleRange;
use crate::sweep::{snapshots, SweepEngine};

/// One varying input of a grid and its samples.
#[derive(Clone, Debug, PartialEq)]
pub struct GridAxis {
    pub parameter: ContractParameter,
    pub samples: Vec<f64>,
}

impl GridAxis {
    pub fn new(parameter: ContractParameter, samples: Vec<f64>) -> Self {
        Self { parameter, samples }
    }

    pub fn from_range(
        parameter: ContractParameter,
        range: &SampleRange,
    ) -> Result<Self, SweepError> {
        Ok(Self::new(parameter, range.linspace()?))
    }
}

/// Option price over two varying inputs.
///
/// `z_matrix[[i, j]]` is priced with row sample `y_values[i]` and column sample `x_values[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceGrid {
    pub option_type: OptionType,
    pub row_parameter: ContractParameter,
    pub column_parameter: ContractParameter,
    /// column samples
    pub x_values: Vec<f64>,
    /// row samples
    pub y_values: Vec<f64>,
    pub z_matrix: Array2<f64>,
}

impl PriceGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.z_matrix.dim()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.z_matrix.outer_iter().map(|row| row.to_vec()).collect()
    }
}

struct Rows<'a>(&'a Array2<f64>);

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.outer_iter().map(|row| row.to_vec()))
    }
}

// the matrix goes out as nested rows, which is what heat map renderers read
impl Serialize for PriceGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PriceGrid", 6)?;
        state.serialize_field("option_type", &self.option_type)?;
        state.serialize_field("row_parameter", &self.row_parameter)?;
        state.serialize_field("column_parameter", &self.column_parameter)?;
        state.serialize_field("x_values", &self.x_values)?;
        state.serialize_field("y_values", &self.y_values)?;
        state.serialize_field("z_matrix", &Rows(&self.z_matrix))?;
        state.end()
    }
}

impl SweepEngine {
    pub fn price_grid(
        &self,
        base: &OptionContract,
        rows: &GridAxis,
        columns: &GridAxis,
        option_type: OptionType,
    ) -> Result<PriceGrid, SweepError> {
        if rows.parameter == columns.parameter {
            return Err(SweepError::SameAxis(rows.parameter));
        }
        debug!(
            rows = %rows.parameter,
            columns = %columns.parameter,
            shape = ?(rows.samples.len(), columns.samples.len()),
            evaluation = ?self.evaluation(),
            "price grid"
        );

        let mut cells = Vec::with_capacity(rows.samples.len() * columns.samples.len());
        for row in snapshots(base, rows.parameter, &rows.samples)? {
            cells.extend(snapshots(&row, columns.parameter, &columns.samples)?);
        }
        let prices = self.map(&cells, |c| BlackScholesMerton::price(c, option_type));
        let z_matrix = Array2::from_shape_vec((rows.samples.len(), columns.samples.len()), prices)?;

        Ok(PriceGrid {
            option_type,
            row_parameter: rows.parameter,
            column_parameter: columns.parameter,
            x_values: columns.samples.clone(),
            y_values: rows.samples.clone(),
            z_matrix,
        })
    }

    /// Call prices with strike (spot ± 25) on the rows and volatility on the columns.
    pub fn strike_volatility_grid(&self, base: &OptionContract) -> Result<PriceGrid, SweepError> {
        let strikes =
            GridAxis::from_range(ContractParameter::Strike, &SampleRange::strike_band(base))?;
        let volas = GridAxis::from_range(
            ContractParameter::Volatility,
            &SampleRange::volatility_axis(),
        )?;
        self.price_grid(base, &strikes, &volas, OptionType::Call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> OptionContract {
        OptionContract::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    #[test]
    fn default_heat_map() {
        let contract = base();
        let grid = SweepEngine::sequential().strike_volatility_grid(&contract).unwrap();

        assert_eq!(grid.shape(), (50, 50));
        assert_eq!(grid.y_values.len(), 50);
        assert_eq!(grid.x_values.len(), 50);
        assert_eq!(grid.row_parameter, ContractParameter::Strike);
        assert_eq!(grid.column_parameter, ContractParameter::Volatility);
        assert_eq!(contract, base());

        let (i, j) = (7, 31);
        let point = contract
            .with_strike(grid.y_values[i])
            .and_then(|c| c.with_volatility(grid.x_values[j]))
            .unwrap();
        assert_eq!(grid.z_matrix[[i, j]], BlackScholesMerton::call(&point));
    }

    #[test]
    fn cheaper_for_higher_strikes_dearer_for_higher_volatility() {
        let grid = SweepEngine::parallel()
            .strike_volatility_grid(&base())
            .unwrap();
        for row in grid.z_matrix.rows() {
            assert!(row.windows(2).into_iter().all(|w| w[0] <= w[1]));
        }
        for column in grid.z_matrix.columns() {
            assert!(column.windows(2).into_iter().all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let contract = base();
        let rows = GridAxis::new(ContractParameter::Spot, vec![80.0, 100.0, 120.0]);
        let columns = GridAxis::new(ContractParameter::Maturity, vec![0.0, 0.5, 1.0, 2.0]);

        let sequential = SweepEngine::sequential()
            .price_grid(&contract, &rows, &columns, OptionType::Put)
            .unwrap();
        let parallel = SweepEngine::parallel()
            .price_grid(&contract, &rows, &columns, OptionType::Put)
            .unwrap();
        assert_eq!(sequential, parallel);
        // expired column is intrinsic
        assert_eq!(sequential.z_matrix[[0, 0]], 20.0);
        assert_eq!(sequential.z_matrix[[2, 0]], 0.0);
    }

    #[test]
    fn rejects_bad_axes() {
        let strikes = GridAxis::new(ContractParameter::Strike, vec![90.0, 100.0]);
        assert!(matches!(
            SweepEngine::sequential().price_grid(&base(), &strikes, &strikes, OptionType::Call),
            Err(SweepError::SameAxis(ContractParameter::Strike))
        ));

        let empty = GridAxis::new(ContractParameter::Volatility, vec![]);
        assert!(matches!(
            SweepEngine::sequential().price_grid(&base(), &strikes, &empty, OptionType::Call),
            Err(SweepError::EmptyRange)
        ));

        let negative = GridAxis::new(ContractParameter::Volatility, vec![0.1, -0.1]);
        assert!(matches!(
            SweepEngine::sequential().price_grid(&base(), &strikes, &negative, OptionType::Call),
            Err(SweepError::InvalidSample { index: 1, .. })
        ));
    }

    #[test]
    fn serializes_nested_rows() {
        let rows = GridAxis::new(ContractParameter::Strike, vec![90.0, 100.0, 110.0]);
        let columns = GridAxis::new(ContractParameter::Volatility, vec![0.1, 0.2]);
        let grid = SweepEngine::sequential()
            .price_grid(&base(), &rows, &columns, OptionType::Call)
            .unwrap();

        let json = serde_json::to_value(&grid).unwrap();
        let z = json["z_matrix"].as_array().unwrap();
        assert_eq!(z.len(), 3);
        assert!(z.iter().all(|row| row.as_array().unwrap().len() == 2));
        assert_eq!(json["y_values"].as_array().unwrap().len(), 3);
        assert_eq!(json["row_parameter"], "strike");
        assert_eq!(grid.rows()[1][0], grid.z_matrix[[1, 0]]);
    }

    proptest! {
        #[test]
        fn grid_shape(m in 1usize..20, n in 1usize..20, parallel in any::<bool>()) {
            let contract = base();
            let strikes = SampleRange::around(100.0, 25.0, m);
            let volas = SampleRange::new(0.0, 1.0, n);
            let rows = GridAxis::from_range(ContractParameter::Strike, &strikes).unwrap();
            let columns = GridAxis::from_range(ContractParameter::Volatility, &volas).unwrap();
            let engine = if parallel { SweepEngine::parallel() } else { SweepEngine::sequential() };

            let grid = engine.price_grid(&contract, &rows, &columns, OptionType::Call).unwrap();
            prop_assert_eq!(grid.shape(), (m, n));
            prop_assert_eq!(grid.rows().len(), m);
            prop_assert!(grid.rows().iter().all(|row| row.len() == n));
            prop_assert_eq!(contract, base());
        }
    }
}
