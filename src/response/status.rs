/// HTTP [Status Code][rfc].
///
/// Only codes listed in this table can be constructed, so every status has a reason phrase to
/// write.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode {
    code: u16,
    status_line: &'static str,
}

macro_rules! status_codes {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self {
                    code: $int,
                    status_line: concat!("HTTP/1.1 ", stringify!($int), " ", $msg, "\r\n"),
                };
            )*

            /// Returns [`StatusCode`] for the given code, or `None` if it is not in the table.
            pub const fn from_u16(code: u16) -> Option<Self> {
                match code {
                    $(
                        $int => Some(Self::$id),
                    )*
                    _ => None,
                }
            }

            /// Returns the reason phrase, e.g: `"OK"`.
            pub const fn reason(&self) -> &'static str {
                match self.code {
                    $(
                        $int => $msg,
                    )*
                    _ => "",
                }
            }
        }
    };
}

impl StatusCode {
    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.code
    }

    /// Returns the full status line including CRLF, e.g: `"HTTP/1.1 200 OK\r\n"`.
    #[inline]
    pub const fn status_line(&self) -> &'static str {
        self.status_line
    }
}

status_codes! {
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `201`. The request succeeded, and a new resource was created as a result.
    201 CREATED "Created";
    /// `204`. There is no content to send for this request.
    204 NO_CONTENT "No Content";
    /// `301`. The URL of the requested resource has been changed permanently.
    301 MOVED_PERMANENTLY "Moved Permanently";
    /// `302`. The URI of requested resource has been changed temporarily.
    302 FOUND "Found";
    /// `304`. The response has not been modified.
    304 NOT_MODIFIED "Not Modified";
    /// `400`. The server cannot or will not process the request due to something that is perceived
    /// to be a client error.
    400 BAD_REQUEST "Bad Request";
    /// `401`. The client must authenticate itself to get the requested response.
    401 UNAUTHORIZED "Unauthorized";
    /// `403`. The client does not have access rights to the content.
    403 FORBIDDEN "Forbidden";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The request method is not supported by the target resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    /// `502`. The server, while working as a gateway, got an invalid response.
    502 BAD_GATEWAY "Bad Gateway";
    /// `503`. The server is not ready to handle the request.
    503 SERVICE_UNAVAILABLE "Service Temporarily Unavailable";
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.reason())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.code).finish()
    }
}
