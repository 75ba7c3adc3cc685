// src/models/dashboard.rs

use std::{collections::BTreeMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::error::AppError;

/// Os dez relatórios do painel, na ordem em que são montados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportKind {
    RevenueByMonth,
    AnnualRevenue,
    BillingByMember,
    MemberTypes,
    TopConsumers,
    TopConsumptionMeters,
    TopAttendanceWeekdays,
    BillingGrowth,
    LeastParticipativeMembers,
    HighestAverageBilling,
}

impl ReportKind {
    pub const ALL: [ReportKind; 10] = [
        ReportKind::RevenueByMonth,
        ReportKind::AnnualRevenue,
        ReportKind::BillingByMember,
        ReportKind::MemberTypes,
        ReportKind::TopConsumers,
        ReportKind::TopConsumptionMeters,
        ReportKind::TopAttendanceWeekdays,
        ReportKind::BillingGrowth,
        ReportKind::LeastParticipativeMembers,
        ReportKind::HighestAverageBilling,
    ];

    /// Chave do relatório no contexto do painel
    pub fn context_key(self) -> &'static str {
        match self {
            ReportKind::RevenueByMonth => "revenue_by_month",
            ReportKind::AnnualRevenue => "annual_revenue",
            ReportKind::BillingByMember => "billing_by_member",
            ReportKind::MemberTypes => "member_types",
            ReportKind::TopConsumers => "top_consumers",
            ReportKind::TopConsumptionMeters => "top_consumption_meters",
            ReportKind::TopAttendanceWeekdays => "top_attendance_weekdays",
            ReportKind::BillingGrowth => "billing_growth",
            ReportKind::LeastParticipativeMembers => "least_participative_members",
            ReportKind::HighestAverageBilling => "highest_average_billing",
        }
    }

    /// Quantidade máxima de linhas, quando a consulta tem LIMIT
    pub fn limit(self) -> Option<usize> {
        match self {
            ReportKind::BillingByMember
            | ReportKind::TopConsumers
            | ReportKind::TopConsumptionMeters => Some(10),
            ReportKind::TopAttendanceWeekdays => Some(2),
            ReportKind::LeastParticipativeMembers | ReportKind::HighestAverageBilling => Some(5),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.context_key())
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.context_key() == s)
            .ok_or_else(|| AppError::ReportNotFound(s.to_string()))
    }
}

// =========================================================================
//  LINHAS BRUTAS (como vêm do banco)
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenueRow {
    pub year: i64,
    pub month_name: String,
    pub total: Decimal,
}

// Compartilhada pelos relatórios 2 e 8
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotalRow {
    pub year: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberBillingRow {
    pub full_name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberTypeRow {
    pub member_type: Option<String>,
    pub member_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberConsumptionRow {
    pub member_name: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterConsumptionRow {
    pub meter_number: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayAttendanceRow {
    pub weekday: Option<String>,
    pub attendance_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationRow {
    pub member_name: Option<String>,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageBillingRow {
    pub member_name: Option<String>,
    pub average: Decimal,
}

// =========================================================================
//  REGISTROS PROJETADOS (o JSON do painel)
// =========================================================================

// 1. Recaudación por mes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    #[serde(rename = "mes")]
    pub month: String,
    #[serde(rename = "total_ingresos")]
    pub total_revenue: f64,
}

// 2. Recaudación anual
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualRevenue {
    #[serde(rename = "anio")]
    pub year: i64,
    #[serde(rename = "total_recaudacion")]
    pub total_revenue: f64,
}

// 3. Facturación por socio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBilling {
    #[serde(rename = "nombre")]
    pub member_name: String,
    #[serde(rename = "total_facturado")]
    pub total_billed: f64,
}

// 4. Tipos de socios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberTypeCount {
    #[serde(rename = "tipo")]
    pub member_type: Option<String>,
    #[serde(rename = "total_socios")]
    pub total_members: i64,
}

// 5. Clientes con mayor consumo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopConsumer {
    #[serde(rename = "nombre")]
    pub member_name: Option<String>,
    #[serde(rename = "consumo_total")]
    pub total_consumption: f64,
}

// 6. Medidores con mayor consumo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterConsumption {
    #[serde(rename = "medidor")]
    pub meter_number: Option<String>,
    #[serde(rename = "consumo_total")]
    pub total_consumption: f64,
}

// 7. Días con más asistencias
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAttendance {
    #[serde(rename = "dia")]
    pub weekday: Option<String>,
    #[serde(rename = "total_asistencias")]
    pub total_attendance: i64,
}

// 8. Crecimiento de facturación
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingGrowth {
    #[serde(rename = "anio")]
    pub year: i64,
    #[serde(rename = "total_facturado")]
    pub total_billed: f64,
}

// 9. Socios menos participativos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberParticipation {
    #[serde(rename = "nombre")]
    pub member_name: Option<String>,
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
}

// 10. Mayor facturación promedio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAverageBilling {
    #[serde(rename = "nombre")]
    pub member_name: Option<String>,
    #[serde(rename = "facturacion_promedio")]
    pub average_billing: f64,
}

/// Contexto completo do painel, uma chave por relatório.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardContext {
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub annual_revenue: Vec<AnnualRevenue>,
    pub billing_by_member: Vec<MemberBilling>,
    pub member_types: Vec<MemberTypeCount>,
    pub top_consumers: Vec<TopConsumer>,
    pub top_consumption_meters: Vec<MeterConsumption>,
    pub top_attendance_weekdays: Vec<WeekdayAttendance>,
    pub billing_growth: Vec<BillingGrowth>,
    pub least_participative_members: Vec<MemberParticipation>,
    pub highest_average_billing: Vec<MemberAverageBilling>,
}

impl DashboardContext {
    /// Cada relatório serializado como array JSON, pronto para um template.
    pub fn serialized(&self) -> Result<BTreeMap<&'static str, String>, AppError> {
        let mut out = BTreeMap::new();
        out.insert(ReportKind::RevenueByMonth.context_key(), serde_json::to_string(&self.revenue_by_month)?);
        out.insert(ReportKind::AnnualRevenue.context_key(), serde_json::to_string(&self.annual_revenue)?);
        out.insert(ReportKind::BillingByMember.context_key(), serde_json::to_string(&self.billing_by_member)?);
        out.insert(ReportKind::MemberTypes.context_key(), serde_json::to_string(&self.member_types)?);
        out.insert(ReportKind::TopConsumers.context_key(), serde_json::to_string(&self.top_consumers)?);
        out.insert(ReportKind::TopConsumptionMeters.context_key(), serde_json::to_string(&self.top_consumption_meters)?);
        out.insert(ReportKind::TopAttendanceWeekdays.context_key(), serde_json::to_string(&self.top_attendance_weekdays)?);
        out.insert(ReportKind::BillingGrowth.context_key(), serde_json::to_string(&self.billing_growth)?);
        out.insert(ReportKind::LeastParticipativeMembers.context_key(), serde_json::to_string(&self.least_participative_members)?);
        out.insert(ReportKind::HighestAverageBilling.context_key(), serde_json::to_string(&self.highest_average_billing)?);
        Ok(out)
    }
}
