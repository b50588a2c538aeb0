//! # Policy Lexicon — 配信規約セーフな語彙カタログ
//!
//! ブランド名はコンテンツブロックを誘発するが、型番 + 外観記述は通る
//! ("Porsche" はブロック、"911" は正常レンダリング)。
//! 具体エントリ (ブランド + モデル) を先に、単独ブランド名を後に照合する。

use foundry_core::policy::{GenericPhrase, SpecificPhrase};

fn specific(phrase: &str, identifier: &str, descriptors: &str) -> SpecificPhrase {
    SpecificPhrase {
        phrase: phrase.to_string(),
        identifier: identifier.to_string(),
        descriptors: descriptors.to_string(),
    }
}

fn generic(phrase: &str, replacement: &str) -> GenericPhrase {
    GenericPhrase {
        phrase: phrase.to_string(),
        replacement: replacement.to_string(),
    }
}

/// ブランド + モデルの具体エントリ。照合はこの並び順で行う
pub fn builtin_specific_phrases() -> Vec<SpecificPhrase> {
    vec![
        // German sports/luxury
        specific("porsche 911", "911", "sports coupe with rear-engine silhouette"),
        specific("porsche taycan", "Taycan", "electric sport sedan with flowing roofline"),
        specific("porsche macan", "Macan", "compact performance SUV with sport styling"),
        specific("porsche cayenne", "Cayenne", "luxury performance SUV"),
        // Tesla
        specific("tesla model s", "Model S", "electric sedan with panoramic glass roof"),
        specific("tesla model 3", "Model 3", "electric compact sedan with minimalist design"),
        specific("tesla model x", "Model X", "electric SUV with falcon-wing doors"),
        specific("tesla model y", "Model Y", "electric compact crossover SUV"),
        specific("tesla cybertruck", "Cybertruck", "angular stainless steel electric pickup"),
        // BMW
        specific("bmw m3", "M3", "sport sedan with aggressive front fascia and wide stance"),
        specific("bmw m4", "M4", "sport coupe with large kidney grille and muscular fenders"),
        specific("bmw m5", "M5", "executive sport sedan with quad exhaust"),
        specific("bmw i4", "i4", "electric grand coupe with flowing silhouette"),
        specific("bmw ix", "iX", "electric luxury SUV with minimalist design"),
        // Mercedes
        specific("mercedes amg gt", "AMG GT", "long-hood grand tourer with Panamericana grille"),
        specific("mercedes s-class", "S-Class", "flagship luxury sedan"),
        specific("mercedes eqs", "EQS", "electric luxury sedan with one-bow silhouette"),
        specific("mercedes g-wagon", "G-Class", "boxy off-road SUV with military heritage"),
        specific("mercedes g-class", "G-Class", "boxy off-road SUV with military heritage"),
        // Audi
        specific("audi r8", "R8", "mid-engine supercar with sideblades"),
        specific("audi rs6", "RS6", "performance wagon with wide-body fenders"),
        specific("audi e-tron gt", "e-tron GT", "electric grand tourer with sculpted sides"),
        // Italian exotics
        specific("ferrari 488", "488", "mid-engine Italian supercar with aggressive aero"),
        specific("ferrari sf90", "SF90", "hybrid hypercar with F1-derived technology"),
        specific("ferrari roma", "Roma", "elegant front-engine grand tourer"),
        specific(
            "lamborghini huracan",
            "Huracan",
            "angular mid-engine supercar with hexagonal design language",
        ),
        specific("lamborghini urus", "Urus", "super SUV with aggressive angular styling"),
        specific(
            "lamborghini revuelto",
            "Revuelto",
            "hybrid supercar with dramatic Y-shaped lighting",
        ),
        // American
        specific("ford mustang", "Mustang", "American muscle car with tri-bar taillights"),
        specific("ford f-150", "F-150", "full-size pickup truck"),
        specific("ford bronco", "Bronco", "rugged off-road SUV with round headlights"),
        specific("chevrolet corvette", "Corvette", "mid-engine American sports car"),
        specific("chevrolet camaro", "Camaro", "American muscle coupe with aggressive stance"),
        specific("dodge challenger", "Challenger", "retro-styled American muscle car"),
        // Japanese performance
        specific("nissan gt-r", "GT-R", "twin-turbo sports car with quad circular taillights"),
        specific("toyota supra", "Supra", "sport coupe with double-bubble roof"),
        specific("honda nsx", "NSX", "hybrid supercar with floating C-pillar"),
        specific("mazda mx-5", "MX-5", "lightweight roadster convertible"),
        // British
        specific("aston martin db11", "DB11", "grand tourer with aeroblade vents"),
        specific("aston martin vantage", "Vantage", "compact sports car with wide grille"),
        specific("mclaren 720s", "720S", "supercar with dihedral doors and eye sockets"),
        specific("bentley continental", "Continental", "luxury grand tourer with matrix grille"),
        specific("rolls-royce phantom", "Phantom", "ultra-luxury sedan with pantheon grille"),
        // EV newcomers
        specific("rivian r1t", "R1T", "electric adventure pickup with stadium headlights"),
        specific("rivian r1s", "R1S", "electric adventure SUV with stadium headlights"),
        specific("lucid air", "Air", "sleek electric luxury sedan"),
    ]
}

/// モデル指定なしの単独ブランド名エントリ
pub fn builtin_generic_phrases() -> Vec<GenericPhrase> {
    vec![
        generic("porsche", "German sports car"),
        generic("tesla", "electric vehicle"),
        generic("bmw", "German luxury car"),
        generic("mercedes", "luxury sedan"),
        generic("mercedes-benz", "luxury sedan"),
        generic("audi", "German luxury car"),
        generic("ferrari", "Italian supercar"),
        generic("lamborghini", "Italian supercar"),
        generic("ford", "American vehicle"),
        generic("chevrolet", "American vehicle"),
        generic("chevy", "American vehicle"),
        generic("dodge", "American muscle car"),
        generic("nissan", "Japanese vehicle"),
        generic("toyota", "Japanese vehicle"),
        generic("honda", "Japanese vehicle"),
        generic("mazda", "Japanese vehicle"),
        generic("aston martin", "British grand tourer"),
        generic("mclaren", "British supercar"),
        generic("bentley", "British luxury car"),
        generic("rolls-royce", "ultra-luxury vehicle"),
        generic("rivian", "electric adventure vehicle"),
        generic("lucid", "electric luxury sedan"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_core::policy::PolicyTranslator;

    #[test]
    fn test_specific_entries_precede_their_generic_brand() {
        // "porsche 911" は generic "porsche" より先に照合されなければならない
        let translator =
            PolicyTranslator::new(builtin_specific_phrases(), builtin_generic_phrases()).unwrap();
        let outcome = translator.translate("A Porsche 911 at dawn");
        assert!(outcome.translated);
        assert_eq!(outcome.phrase_detected.as_deref(), Some("porsche 911"));
        assert!(outcome.text.contains("911 sports coupe with rear-engine silhouette"));
        assert!(!outcome.text.to_lowercase().contains("porsche"));
    }

    #[test]
    fn test_standalone_brand_replaced_generically() {
        let translator =
            PolicyTranslator::new(builtin_specific_phrases(), builtin_generic_phrases()).unwrap();
        let outcome = translator.translate("a tesla on the highway");
        assert!(outcome.translated);
        assert_eq!(outcome.phrase_detected.as_deref(), Some("tesla"));
        assert!(outcome.text.contains("electric vehicle"));
    }

    #[test]
    fn test_catalog_is_compilable() {
        // 全エントリの正規表現コンパイルが通ること
        let translator =
            PolicyTranslator::new(builtin_specific_phrases(), builtin_generic_phrases());
        assert!(translator.is_ok());
    }
}
