/// Declares an enum whose variants map one-to-one onto Vulkan name strings
/// (extension or layer names), with lookups in both directions.
#[macro_export]
macro_rules! enum_impl {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $ext:expr,
            )+
        }
    ) => {
        $(#[$outer])*
        $enum_vis enum $name {
            $(
                $(#[$inner])*
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Returns the Vulkan name buffer with stable storage.
            #[inline]
            pub fn name(self) -> &'static $crate::vulkan::extensions::ExtensionStr {
                match self {
                    $(
                        Self::$variant => {
                            static BUF: $crate::vulkan::extensions::ExtensionStr = $ext;
                            &BUF
                        }
                    )+
                }
            }

            /// Looks the variant up from a raw Vulkan name.
            #[inline]
            pub fn from_name(name: &$crate::vulkan::extensions::ExtensionStr) -> Option<Self> {
                Self::ALL.iter().copied().find(|variant| variant.name() == name)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.name().to_string_lossy())
            }
        }
    };
}
