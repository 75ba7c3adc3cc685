// src/common/months.rs

// Tabela fixa: nome do mês em inglês (como o Postgres devolve) -> espanhol
const MONTH_NAMES: [(&str, &str); 12] = [
    ("January", "Enero"),
    ("February", "Febrero"),
    ("March", "Marzo"),
    ("April", "Abril"),
    ("May", "Mayo"),
    ("June", "Junio"),
    ("July", "Julio"),
    ("August", "Agosto"),
    ("September", "Septiembre"),
    ("October", "Octubre"),
    ("November", "Noviembre"),
    ("December", "Diciembre"),
];

/// Traduz o nome do mês para o espanhol. Nomes desconhecidos passam intactos.
pub fn translate_month(name: &str) -> String {
    MONTH_NAMES
        .iter()
        .find(|(english, _)| *english == name)
        .map(|(_, spanish)| (*spanish).to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_every_calendar_month() {
        let translated: Vec<String> = MONTH_NAMES
            .iter()
            .map(|(english, _)| translate_month(english))
            .collect();

        assert_eq!(translated.first().map(String::as_str), Some("Enero"));
        assert_eq!(translated.last().map(String::as_str), Some("Diciembre"));
        assert_eq!(translated.len(), 12);
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(translate_month("Smarch"), "Smarch");
        assert_eq!(translate_month("january"), "january");
        assert_eq!(translate_month(""), "");
    }
}
