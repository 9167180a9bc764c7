use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use printcost_parser::{CanonicalRecord, PrinterFamily};
use tracing::debug;

use crate::error::{BillingError, Result};

/// Ordered, accumulated canonical records of one printer family.
#[derive(Debug, Clone)]
pub struct CanonicalDataset {
    family: PrinterFamily,
    df: DataFrame,
}

impl CanonicalDataset {
    /// An empty dataset with the family's canonical columns.
    pub fn empty(family: PrinterFamily) -> Result<Self> {
        let columns: Vec<Column> = family
            .columns()
            .iter()
            .map(|(name, kind)| {
                Series::new((*name).into(), Vec::<Option<f64>>::new())
                    .cast(&kind.dtype())
                    .map(Column::from)
            })
            .collect::<std::result::Result<_, _>>()?;
        Ok(Self {
            family,
            df: DataFrame::new(columns)?,
        })
    }

    /// Adopts a previously produced dataset. Every canonical column must be present; extra
    /// columns are dropped and the rest are cast and reordered into canonical shape.
    pub fn from_frame(family: PrinterFamily, df: DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(family.columns().len());
        for (name, kind) in family.columns() {
            let column = df
                .column(name)
                .map_err(|_| BillingError::MissingColumn {
                    family,
                    column: *name,
                })?
                .cast(&kind.dtype())?;
            columns.push(column);
        }
        Ok(Self {
            family,
            df: DataFrame::new(columns)?,
        })
    }

    /// Starts accumulation for a run. The first batch always starts empty; later batches
    /// continue from `prior` when one is supplied.
    pub fn start(
        family: PrinterFamily,
        prior: Option<DataFrame>,
        first_batch: bool,
    ) -> Result<Self> {
        match prior {
            Some(df) if !first_batch => {
                debug!(%family, rows = df.height(), "Resuming from prior dataset");
                Self::from_frame(family, df)
            }
            Some(_) => {
                debug!(%family, "First batch; discarding prior dataset");
                Self::empty(family)
            }
            None => Self::empty(family),
        }
    }

    pub fn extend<R: CanonicalRecord>(&mut self, records: &[R]) -> Result<()> {
        if R::FAMILY != self.family {
            return Err(BillingError::FamilyMismatch {
                expected: self.family,
                found: R::FAMILY,
            });
        }
        if records.is_empty() {
            return Ok(());
        }
        let batch = R::to_frame(records)?;
        self.df.vstack_mut(&batch)?;
        Ok(())
    }

    pub fn family(&self) -> PrinterFamily {
        self.family
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn finish(self) -> DataFrame {
        self.df
    }
}
