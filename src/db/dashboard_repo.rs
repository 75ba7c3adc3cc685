// src/db/dashboard_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::report_source::{FromReportRow, ReportQuery, ReportRow, ReportSource},
    models::dashboard::{
        AverageBillingRow, MemberBillingRow, MemberConsumptionRow, MemberTypeRow,
        MeterConsumptionRow, MonthlyRevenueRow, ParticipationRow, ReportKind,
        WeekdayAttendanceRow, YearTotalRow,
    },
};

// =========================================================================
//  CATÁLOGO DE CONSULTAS (Postgres)
// =========================================================================

// 1. Recaudación por mes (ano fixo 2024), meses na ordem do calendário
const REVENUE_BY_MONTH_SQL: &str = r#"
    SELECT
        EXTRACT(YEAR FROM r.fecha_emision_rec)::bigint AS anio,
        TO_CHAR(r.fecha_emision_rec, 'FMMonth') AS mes_nombre,
        SUM(d.subtotal_det + d.iva_det) AS total_ingresos
    FROM recaudacion r
    JOIN detalle d ON r.id_rec = d.fk_id_rec
    WHERE EXTRACT(YEAR FROM r.fecha_emision_rec) = 2024
    GROUP BY 1, 2
    ORDER BY 1 DESC, MIN(EXTRACT(MONTH FROM r.fecha_emision_rec)) ASC
"#;

// 2. Recaudación total por año
const ANNUAL_REVENUE_SQL: &str = r#"
    SELECT
        EXTRACT(YEAR FROM r.fecha_emision_rec)::bigint AS anio,
        SUM(d.subtotal_det + d.iva_det) AS total
    FROM recaudacion r
    JOIN detalle d ON r.id_rec = d.fk_id_rec
    GROUP BY 1
    ORDER BY 1 DESC
"#;

// 3. Facturación por socio (Top 10)
const BILLING_BY_MEMBER_SQL: &str = r#"
    SELECT
        CONCAT(s.nombres_soc, ' ', s.primer_apellido_soc) AS nombre,
        SUM(d.subtotal_det + d.iva_det) AS total_facturado
    FROM recaudacion r
    JOIN socio s ON r.fk_id_soc = s.id_soc
    JOIN detalle d ON r.id_rec = d.fk_id_rec
    GROUP BY s.id_soc, s.nombres_soc, s.primer_apellido_soc
    ORDER BY total_facturado DESC
    LIMIT 10
"#;

// 4. Tipos de socios
const MEMBER_TYPES_SQL: &str = r#"
    SELECT
        tipo_soc::text AS tipo_soc,
        COUNT(*) AS total_socios
    FROM socio
    GROUP BY tipo_soc
    ORDER BY total_socios DESC
"#;

// 5. Clientes con mayor consumo (Top 10)
const TOP_CONSUMERS_SQL: &str = r#"
    SELECT
        s.nombres_soc::text AS nombre,
        SUM(l.lectura_actual_lec - l.lectura_anterior_lec) AS consumo_total
    FROM lectura l
    JOIN historial_propietario h ON l.fk_id_his = h.id_his
    JOIN socio s ON h.fk_id_soc = s.id_soc
    GROUP BY s.nombres_soc
    ORDER BY consumo_total DESC
    LIMIT 10
"#;

// 6. Medidores con mayor consumo (Top 10). A FK de lectura é reaproveitada para o medidor.
const TOP_CONSUMPTION_METERS_SQL: &str = r#"
    SELECT
        m.numero_med::text AS medidor,
        SUM(l.lectura_actual_lec - l.lectura_anterior_lec) AS consumo_total
    FROM lectura l
    JOIN medidor m ON l.fk_id_his = m.id_med
    GROUP BY m.numero_med
    ORDER BY consumo_total DESC
    LIMIT 10
"#;

// 7. Días de la semana con más asistencias (Top 2)
const TOP_ATTENDANCE_WEEKDAYS_SQL: &str = r#"
    SELECT
        TO_CHAR(e.fecha_hora_eve, 'FMDay') AS dia_semana,
        COUNT(a.id_asi) AS total_asistencias
    FROM asistencia a
    JOIN evento e ON a.fk_id_eve = e.id_eve
    GROUP BY 1
    ORDER BY total_asistencias DESC
    LIMIT 2
"#;

// 8. Crecimiento de facturación anual. Mesmo texto do relatório 2, executado à parte.
const BILLING_GROWTH_SQL: &str = r#"
    SELECT
        EXTRACT(YEAR FROM r.fecha_emision_rec)::bigint AS anio,
        SUM(d.subtotal_det + d.iva_det) AS total
    FROM recaudacion r
    JOIN detalle d ON r.id_rec = d.fk_id_rec
    GROUP BY 1
    ORDER BY 1 DESC
"#;

// 9. Socios menos participativos (Top 5).
// Sem eventos cadastrados o HAVING descarta tudo: resultado vazio em vez de divisão por zero.
const LEAST_PARTICIPATIVE_MEMBERS_SQL: &str = r#"
    SELECT
        s.nombres_soc::text AS nombre,
        COUNT(a.id_asi)::numeric / NULLIF((SELECT COUNT(*) FROM evento), 0) * 100
            AS porcentaje_participacion
    FROM socio s
    LEFT JOIN asistencia a ON s.id_soc = a.fk_id_soc
    GROUP BY s.nombres_soc
    HAVING (SELECT COUNT(*) FROM evento) > 0
    ORDER BY porcentaje_participacion ASC
    LIMIT 5
"#;

// 10. Socios con mayor facturación promedio (Top 5)
const HIGHEST_AVERAGE_BILLING_SQL: &str = r#"
    SELECT
        s.nombres_soc::text AS nombre,
        AVG(d.subtotal_det + d.iva_det) AS facturacion_promedio
    FROM recaudacion r
    JOIN socio s ON r.fk_id_soc = s.id_soc
    JOIN detalle d ON r.id_rec = d.fk_id_rec
    GROUP BY s.nombres_soc
    ORDER BY facturacion_promedio DESC
    LIMIT 5
"#;

/// A consulta SQL de cada relatório.
pub fn report_query(kind: ReportKind) -> ReportQuery {
    let sql = match kind {
        ReportKind::RevenueByMonth => REVENUE_BY_MONTH_SQL,
        ReportKind::AnnualRevenue => ANNUAL_REVENUE_SQL,
        ReportKind::BillingByMember => BILLING_BY_MEMBER_SQL,
        ReportKind::MemberTypes => MEMBER_TYPES_SQL,
        ReportKind::TopConsumers => TOP_CONSUMERS_SQL,
        ReportKind::TopConsumptionMeters => TOP_CONSUMPTION_METERS_SQL,
        ReportKind::TopAttendanceWeekdays => TOP_ATTENDANCE_WEEKDAYS_SQL,
        ReportKind::BillingGrowth => BILLING_GROWTH_SQL,
        ReportKind::LeastParticipativeMembers => LEAST_PARTICIPATIVE_MEMBERS_SQL,
        ReportKind::HighestAverageBilling => HIGHEST_AVERAGE_BILLING_SQL,
    };
    ReportQuery { kind, sql }
}

// =========================================================================
//  DECODIFICAÇÃO DAS LINHAS
// =========================================================================

impl FromReportRow for MonthlyRevenueRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            year: row.integer("anio")?,
            month_name: row.text("mes_nombre")?,
            total: row.decimal("total_ingresos")?,
        })
    }
}

impl FromReportRow for YearTotalRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            year: row.integer("anio")?,
            total: row.decimal("total")?,
        })
    }
}

impl FromReportRow for MemberBillingRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            full_name: row.text("nombre")?,
            total: row.decimal("total_facturado")?,
        })
    }
}

impl FromReportRow for MemberTypeRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            member_type: row.opt_text("tipo_soc")?,
            member_count: row.integer("total_socios")?,
        })
    }
}

impl FromReportRow for MemberConsumptionRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            member_name: row.opt_text("nombre")?,
            total: row.decimal("consumo_total")?,
        })
    }
}

impl FromReportRow for MeterConsumptionRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            meter_number: row.opt_text("medidor")?,
            total: row.decimal("consumo_total")?,
        })
    }
}

impl FromReportRow for WeekdayAttendanceRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            weekday: row.opt_text("dia_semana")?,
            attendance_count: row.integer("total_asistencias")?,
        })
    }
}

impl FromReportRow for ParticipationRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            member_name: row.opt_text("nombre")?,
            percentage: row.decimal("porcentaje_participacion")?,
        })
    }
}

impl FromReportRow for AverageBillingRow {
    fn from_report_row(row: &ReportRow) -> Result<Self, AppError> {
        Ok(Self {
            member_name: row.opt_text("nombre")?,
            average: row.decimal("facturacion_promedio")?,
        })
    }
}

// =========================================================================
//  REPOSITÓRIO
// =========================================================================

#[derive(Clone)]
pub struct DashboardRepository {
    source: Arc<dyn ReportSource>,
}

impl DashboardRepository {
    pub fn new(source: Arc<dyn ReportSource>) -> Self {
        Self { source }
    }

    // Uma consulta, nenhuma recuperação: o erro sobe para quem chamou
    async fn run<R: FromReportRow>(&self, kind: ReportKind) -> Result<Vec<R>, AppError> {
        let query = report_query(kind);
        let rows = self.source.fetch_rows(&query).await?;

        tracing::debug!(report = %kind, rows = rows.len(), limit = ?kind.limit(), "relatório executado");

        rows.iter().map(R::from_report_row).collect()
    }

    // 1.
    pub async fn revenue_by_month(&self) -> Result<Vec<MonthlyRevenueRow>, AppError> {
        self.run(ReportKind::RevenueByMonth).await
    }

    // 2.
    pub async fn annual_revenue(&self) -> Result<Vec<YearTotalRow>, AppError> {
        self.run(ReportKind::AnnualRevenue).await
    }

    // 3.
    pub async fn billing_by_member(&self) -> Result<Vec<MemberBillingRow>, AppError> {
        self.run(ReportKind::BillingByMember).await
    }

    // 4.
    pub async fn member_types(&self) -> Result<Vec<MemberTypeRow>, AppError> {
        self.run(ReportKind::MemberTypes).await
    }

    // 5.
    pub async fn top_consumers(&self) -> Result<Vec<MemberConsumptionRow>, AppError> {
        self.run(ReportKind::TopConsumers).await
    }

    // 6.
    pub async fn top_consumption_meters(&self) -> Result<Vec<MeterConsumptionRow>, AppError> {
        self.run(ReportKind::TopConsumptionMeters).await
    }

    // 7.
    pub async fn top_attendance_weekdays(&self) -> Result<Vec<WeekdayAttendanceRow>, AppError> {
        self.run(ReportKind::TopAttendanceWeekdays).await
    }

    // 8.
    pub async fn billing_growth(&self) -> Result<Vec<YearTotalRow>, AppError> {
        self.run(ReportKind::BillingGrowth).await
    }

    // 9.
    pub async fn least_participative_members(&self) -> Result<Vec<ParticipationRow>, AppError> {
        self.run(ReportKind::LeastParticipativeMembers).await
    }

    // 10.
    pub async fn highest_average_billing(&self) -> Result<Vec<AverageBillingRow>, AppError> {
        self.run(ReportKind::HighestAverageBilling).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::db::report_source::{testing::StaticReportSource, Scalar};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn limited_reports_carry_their_limit_in_sql() {
        for kind in ReportKind::ALL {
            let sql = report_query(kind).sql;
            match kind.limit() {
                Some(n) => assert!(sql.contains(&format!("LIMIT {}", n)), "{kind}"),
                None => assert!(!sql.contains("LIMIT"), "{kind}"),
            }
        }
    }

    #[test]
    fn annual_revenue_and_billing_growth_share_the_same_statement() {
        assert_eq!(
            report_query(ReportKind::AnnualRevenue).sql,
            report_query(ReportKind::BillingGrowth).sql
        );
    }

    #[test]
    fn monthly_revenue_is_fixed_to_2024_in_calendar_order() {
        let sql = report_query(ReportKind::RevenueByMonth).sql;
        assert!(sql.contains("= 2024"));
        assert!(sql.contains("ORDER BY 1 DESC, MIN(EXTRACT(MONTH FROM r.fecha_emision_rec)) ASC"));
    }

    #[test]
    fn participation_keeps_members_without_attendance_and_guards_zero_events() {
        let sql = report_query(ReportKind::LeastParticipativeMembers).sql;
        assert!(sql.contains("LEFT JOIN asistencia"));
        assert!(sql.contains("NULLIF((SELECT COUNT(*) FROM evento), 0)"));
        assert!(sql.contains("HAVING (SELECT COUNT(*) FROM evento) > 0"));
        assert!(sql.contains("ASC"));
    }

    #[tokio::test]
    async fn each_operation_issues_exactly_one_query() {
        let source = Arc::new(StaticReportSource::new());
        let repo = DashboardRepository::new(source.clone());

        repo.top_consumers().await.unwrap();
        repo.billing_growth().await.unwrap();

        assert_eq!(
            source.calls(),
            vec![ReportKind::TopConsumers, ReportKind::BillingGrowth]
        );
    }

    #[tokio::test]
    async fn decodes_consumption_from_integer_sums() {
        let source = StaticReportSource::new().with_rows(
            ReportKind::TopConsumptionMeters,
            vec![ReportRow::new().with("medidor", "MED-001").with("consumo_total", 42_i64)],
        );
        let repo = DashboardRepository::new(Arc::new(source));

        let rows = repo.top_consumption_meters().await.unwrap();

        assert_eq!(
            rows,
            vec![MeterConsumptionRow {
                meter_number: Some("MED-001".into()),
                total: Decimal::from(42),
            }]
        );
    }

    #[tokio::test]
    async fn decodes_zero_participation() {
        let source = StaticReportSource::new().with_rows(
            ReportKind::LeastParticipativeMembers,
            vec![
                ReportRow::new()
                    .with("nombre", "Luis")
                    .with("porcentaje_participacion", dec("0")),
                ReportRow::new()
                    .with("nombre", "Marta")
                    .with("porcentaje_participacion", dec("50.00")),
            ],
        );
        let repo = DashboardRepository::new(Arc::new(source));

        let rows = repo.least_participative_members().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].percentage, Decimal::ZERO);
        assert_eq!(rows[1].member_name.as_deref(), Some("Marta"));
    }

    #[tokio::test]
    async fn null_member_type_is_kept_as_none() {
        let mut row = ReportRow::new();
        row.push("tipo_soc", Scalar::Null);
        row.push("total_socios", Scalar::Integer(2));
        let source = StaticReportSource::new().with_rows(ReportKind::MemberTypes, vec![row]);
        let repo = DashboardRepository::new(Arc::new(source));

        let rows = repo.member_types().await.unwrap();

        assert_eq!(rows, vec![MemberTypeRow { member_type: None, member_count: 2 }]);
    }

    #[tokio::test]
    async fn malformed_row_fails_the_report() {
        let source = StaticReportSource::new().with_rows(
            ReportKind::AnnualRevenue,
            vec![ReportRow::new().with("anio", "2024").with("total", dec("1"))],
        );
        let repo = DashboardRepository::new(Arc::new(source));

        let err = repo.annual_revenue().await.unwrap_err();

        assert!(matches!(err, AppError::UnexpectedColumnType { .. }));
    }
}
