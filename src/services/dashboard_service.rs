// src/services/dashboard_service.rs

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::Value;

use crate::{
    common::{error::AppError, months::translate_month},
    db::DashboardRepository,
    models::dashboard::{
        AnnualRevenue, AverageBillingRow, BillingGrowth, DashboardContext, MemberAverageBilling,
        MemberBilling, MemberBillingRow, MemberConsumptionRow, MemberParticipation,
        MemberTypeCount, MemberTypeRow, MeterConsumption, MeterConsumptionRow, MonthlyRevenue,
        MonthlyRevenueRow, ParticipationRow, ReportKind, TopConsumer, WeekdayAttendance,
        WeekdayAttendanceRow, YearTotalRow,
    },
};

// =========================================================================
//  PROJEÇÃO (linha bruta -> registro do painel)
// =========================================================================

// Perde precisão de propósito: o valor só vai para exibição
fn to_float(value: Decimal) -> Result<f64, AppError> {
    value
        .to_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| AppError::NumericConversion(value.to_string()))
}

pub fn project_revenue_by_month(rows: Vec<MonthlyRevenueRow>) -> Result<Vec<MonthlyRevenue>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(MonthlyRevenue {
                month: translate_month(&row.month_name),
                total_revenue: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_annual_revenue(rows: Vec<YearTotalRow>) -> Result<Vec<AnnualRevenue>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(AnnualRevenue {
                year: row.year,
                total_revenue: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_billing_by_member(rows: Vec<MemberBillingRow>) -> Result<Vec<MemberBilling>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(MemberBilling {
                member_name: row.full_name,
                total_billed: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_member_types(rows: Vec<MemberTypeRow>) -> Vec<MemberTypeCount> {
    rows.into_iter()
        .map(|row| MemberTypeCount {
            member_type: row.member_type,
            total_members: row.member_count,
        })
        .collect()
}

pub fn project_top_consumers(rows: Vec<MemberConsumptionRow>) -> Result<Vec<TopConsumer>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(TopConsumer {
                member_name: row.member_name,
                total_consumption: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_top_consumption_meters(
    rows: Vec<MeterConsumptionRow>,
) -> Result<Vec<MeterConsumption>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(MeterConsumption {
                meter_number: row.meter_number,
                total_consumption: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_top_attendance_weekdays(rows: Vec<WeekdayAttendanceRow>) -> Vec<WeekdayAttendance> {
    rows.into_iter()
        .map(|row| WeekdayAttendance {
            weekday: row.weekday,
            total_attendance: row.attendance_count,
        })
        .collect()
}

pub fn project_billing_growth(rows: Vec<YearTotalRow>) -> Result<Vec<BillingGrowth>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(BillingGrowth {
                year: row.year,
                total_billed: to_float(row.total)?,
            })
        })
        .collect()
}

pub fn project_least_participative_members(
    rows: Vec<ParticipationRow>,
) -> Result<Vec<MemberParticipation>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(MemberParticipation {
                member_name: row.member_name,
                percentage: to_float(row.percentage)?,
            })
        })
        .collect()
}

pub fn project_highest_average_billing(
    rows: Vec<AverageBillingRow>,
) -> Result<Vec<MemberAverageBilling>, AppError> {
    rows.into_iter()
        .map(|row| {
            Ok(MemberAverageBilling {
                member_name: row.member_name,
                average_billing: to_float(row.average)?,
            })
        })
        .collect()
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn revenue_by_month(&self) -> Result<Vec<MonthlyRevenue>, AppError> {
        project_revenue_by_month(self.repo.revenue_by_month().await?)
    }

    pub async fn annual_revenue(&self) -> Result<Vec<AnnualRevenue>, AppError> {
        project_annual_revenue(self.repo.annual_revenue().await?)
    }

    pub async fn billing_by_member(&self) -> Result<Vec<MemberBilling>, AppError> {
        project_billing_by_member(self.repo.billing_by_member().await?)
    }

    pub async fn member_types(&self) -> Result<Vec<MemberTypeCount>, AppError> {
        Ok(project_member_types(self.repo.member_types().await?))
    }

    pub async fn top_consumers(&self) -> Result<Vec<TopConsumer>, AppError> {
        project_top_consumers(self.repo.top_consumers().await?)
    }

    pub async fn top_consumption_meters(&self) -> Result<Vec<MeterConsumption>, AppError> {
        project_top_consumption_meters(self.repo.top_consumption_meters().await?)
    }

    pub async fn top_attendance_weekdays(&self) -> Result<Vec<WeekdayAttendance>, AppError> {
        Ok(project_top_attendance_weekdays(self.repo.top_attendance_weekdays().await?))
    }

    pub async fn billing_growth(&self) -> Result<Vec<BillingGrowth>, AppError> {
        project_billing_growth(self.repo.billing_growth().await?)
    }

    pub async fn least_participative_members(&self) -> Result<Vec<MemberParticipation>, AppError> {
        project_least_participative_members(self.repo.least_participative_members().await?)
    }

    pub async fn highest_average_billing(&self) -> Result<Vec<MemberAverageBilling>, AppError> {
        project_highest_average_billing(self.repo.highest_average_billing().await?)
    }

    /// Monta o painel inteiro, um relatório por vez. Falhou um, falha tudo.
    pub async fn build_dashboard(&self) -> Result<DashboardContext, AppError> {
        let context = DashboardContext {
            revenue_by_month: self.revenue_by_month().await?,
            annual_revenue: self.annual_revenue().await?,
            billing_by_member: self.billing_by_member().await?,
            member_types: self.member_types().await?,
            top_consumers: self.top_consumers().await?,
            top_consumption_meters: self.top_consumption_meters().await?,
            top_attendance_weekdays: self.top_attendance_weekdays().await?,
            billing_growth: self.billing_growth().await?,
            least_participative_members: self.least_participative_members().await?,
            highest_average_billing: self.highest_average_billing().await?,
        };

        tracing::info!("✅ Painel montado com {} relatórios", ReportKind::ALL.len());
        Ok(context)
    }

    /// Um único relatório, já como array JSON.
    pub async fn report_json(&self, kind: ReportKind) -> Result<Value, AppError> {
        let value = match kind {
            ReportKind::RevenueByMonth => serde_json::to_value(self.revenue_by_month().await?)?,
            ReportKind::AnnualRevenue => serde_json::to_value(self.annual_revenue().await?)?,
            ReportKind::BillingByMember => serde_json::to_value(self.billing_by_member().await?)?,
            ReportKind::MemberTypes => serde_json::to_value(self.member_types().await?)?,
            ReportKind::TopConsumers => serde_json::to_value(self.top_consumers().await?)?,
            ReportKind::TopConsumptionMeters => {
                serde_json::to_value(self.top_consumption_meters().await?)?
            }
            ReportKind::TopAttendanceWeekdays => {
                serde_json::to_value(self.top_attendance_weekdays().await?)?
            }
            ReportKind::BillingGrowth => serde_json::to_value(self.billing_growth().await?)?,
            ReportKind::LeastParticipativeMembers => {
                serde_json::to_value(self.least_participative_members().await?)?
            }
            ReportKind::HighestAverageBilling => {
                serde_json::to_value(self.highest_average_billing().await?)?
            }
        };
        Ok(value)
    }
}
