//! Wire-string enumerations accepted by the Gamma API.
//!
//! These are plain lookup tables. [`Language`] and [`ImageModel`] convert into
//! `serde_json::Value` so they can be dropped straight into option maps.

/// Declares a fieldless enum whose variants map one-to-one onto wire strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// The value sent on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> $crate::Result<Self> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err($crate::Error::Validation(format!(
                        "Unknown {} value: {:?}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl From<$name> for ::serde_json::Value {
            fn from(value: $name) -> Self {
                ::serde_json::Value::String(value.as_str().to_string())
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Output language for generated text (`textOptions.language`).
    pub enum Language {
        En => "en",
        EnGb => "en-GB",
        Es => "es",
        Fr => "fr",
        De => "de",
        It => "it",
        Pt => "pt",
        PtBr => "pt-BR",
        Ru => "ru",
        Ja => "ja",
        Ko => "ko",
        ZhCn => "zh-CN",
        ZhTw => "zh-TW",
        Hi => "hi",
        Ar => "ar",
        Nl => "nl",
        Sv => "sv",
        No => "no",
        Da => "da",
        Fi => "fi",
        Pl => "pl",
        Tr => "tr",
        Cs => "cs",
        El => "el",
        He => "he",
        Id => "id",
        Ms => "ms",
        Th => "th",
        Vi => "vi",
        Uk => "uk",
        Ro => "ro",
        Hu => "hu",
        Bg => "bg",
        Sr => "sr",
        Hr => "hr",
        Sk => "sk",
    }
}

wire_enum! {
    /// Image generation model (`imageOptions.model`).
    pub enum ImageModel {
        Imagen4Pro => "imagen-4-pro",
        Imagen4 => "imagen-4",
        Imagen4Lightning => "imagen-4-lightning",
        Imagen3 => "imagen-3",
        Imagen3Lite => "imagen-3-lite",
        Imagen3Ultra => "imagen-3-ultra",
        Imagen3Lightning => "imagen-3-lightning",
        Imagen2 => "imagen-2",
        FluxStandard => "flux-standard",
        FluxPro => "flux-pro",
        FluxUltra => "flux-ultra",
        FluxUltraSquare => "flux-ultra-square",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashSet;

    #[test]
    fn test_wire_strings_are_unique_and_parse_back() {
        let languages: HashSet<_> = Language::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(languages.len(), Language::ALL.len());
        assert_eq!(Language::ALL.len(), 36);

        for model in ImageModel::ALL {
            assert_eq!(model.as_str().parse::<ImageModel>().unwrap(), *model);
        }
    }

    #[test]
    fn test_into_json_value() {
        assert_eq!(Value::from(Language::PtBr), Value::String("pt-BR".to_string()));
        assert_eq!(
            serde_json::to_string(&ImageModel::FluxUltraSquare).unwrap(),
            "\"flux-ultra-square\""
        );
    }

    #[test]
    fn test_unknown_value() {
        assert!("klingon".parse::<Language>().is_err());
    }
}
