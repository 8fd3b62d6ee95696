use anyhow::Result;
use std::io::Write;

use crate::application::FinanceService;
use crate::domain::UserId;

/// Exporter for converting a user's ledger data to CSV or JSON.
pub struct Exporter<'a> {
    service: &'a FinanceService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a FinanceService) -> Self {
        Self { service }
    }

    /// Export a user's expenses to CSV format. Returns the row count.
    pub async fn export_expenses_csv<W: Write>(
        &self,
        user_id: UserId,
        writer: W,
    ) -> Result<usize> {
        let expenses = self.service.list_expenses(user_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "product_name", "amount_cents", "date", "notes"])?;

        let mut count = 0;
        for expense in &expenses {
            csv_writer.write_record(&[
                expense.id.to_string(),
                expense.product_name.clone(),
                expense.amount_cents.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.notes.clone().unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a user's savings goals (and emergency fund, if any) to CSV.
    pub async fn export_savings_csv<W: Write>(&self, user_id: UserId, writer: W) -> Result<usize> {
        let goals = self.service.list_savings_goals(user_id).await?;
        let emergency = self.service.get_emergency_fund(user_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["asset_name", "total_worth_cents", "monthly_savings_cents"])?;

        let mut count = 0;
        for goal in &goals {
            csv_writer.write_record(&[
                goal.asset_name.clone(),
                goal.total_worth_cents.to_string(),
                goal.monthly_savings_cents.to_string(),
            ])?;
            count += 1;
        }

        if let Some(fund) = emergency {
            csv_writer.write_record(&[
                "Emergency Fund".to_string(),
                String::new(),
                fund.monthly_savings_cents.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a user's expenses as pretty-printed JSON.
    pub async fn export_expenses_json<W: Write>(
        &self,
        user_id: UserId,
        mut writer: W,
    ) -> Result<usize> {
        let expenses = self.service.list_expenses(user_id).await?;
        let json = serde_json::to_string_pretty(&expenses)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(expenses.len())
    }

    /// Export a user's savings goals as pretty-printed JSON.
    pub async fn export_savings_json<W: Write>(
        &self,
        user_id: UserId,
        mut writer: W,
    ) -> Result<usize> {
        let goals = self.service.list_savings_goals(user_id).await?;
        let json = serde_json::to_string_pretty(&goals)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(goals.len())
    }
}
